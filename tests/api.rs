//! End-to-end tests for the inbound API against stubbed upstreams.
//!
//! Both upstream APIs are doubled with httpmock servers; requests run
//! through the real router, handlers, client, and query pipeline.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use countryinfo::api::{create_router, AppState};
use countryinfo::config::Config;

/// Router wired to the given upstream base URLs.
fn app(restcountries_url: String, countriesnow_url: String) -> Router {
    let config = Config {
        restcountries_api_url: restcountries_url,
        countriesnow_api_url: countriesnow_url,
        probe_timeout_secs: 1,
        ..Config::default()
    };

    create_router(AppState::new(&config))
}

/// Issue a GET through the router and return status + parsed JSON body.
async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    (status, json)
}

fn norway_lookup_body() -> serde_json::Value {
    serde_json::json!([{
        "name": {"common": "Norway", "official": "Kingdom of Norway"},
        "cca2": "NO",
        "cca3": "NOR",
        "population": 5379475,
        "languages": {"nno": "Norwegian Nynorsk", "nob": "Norwegian Bokmål"},
        "continents": ["Europe"],
        "borders": ["FIN", "SWE", "RUS"],
        "flag": "🇳🇴",
        "capital": ["Oslo"]
    }])
}

fn population_body(iso3: &str) -> serde_json::Value {
    serde_json::json!({
        "error": false,
        "msg": "ok",
        "data": [
            {
                "country": "Sweden",
                "code": "SE",
                "iso3": "SWE",
                "populationCounts": [{"year": 2010, "value": 9378126}]
            },
            {
                "country": "Norway",
                "code": "NO",
                "iso3": iso3,
                "populationCounts": [
                    {"year": 2009, "value": 4828726},
                    {"year": 2010, "value": 4889252},
                    {"year": 2011, "value": 4953088}
                ]
            }
        ]
    })
}

#[tokio::test]
async fn population_with_limit_filters_and_truncates_mean() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(200).json_body(population_body("NOR"));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/NO?limit=2010-2011").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "mean": 4921170,
            "values": [
                {"year": 2010, "value": 4889252},
                {"year": 2011, "value": 4953088}
            ]
        })
    );
}

#[tokio::test]
async fn population_without_limit_returns_all_years() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(200).json_body(population_body("NOR"));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/NO").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["values"].as_array().unwrap().len(), 3);
    // (4828726 + 4889252 + 4953088) / 3, truncated.
    assert_eq!(json["mean"], 4890355);
}

#[tokio::test]
async fn population_series_match_is_case_insensitive() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(200).json_body(population_body("nor"));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, _) = get(&app, "/countryinfo/v1/population/NO?limit=2010-2011").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_limit_is_a_400_with_usage_hint_and_no_upstream_calls() {
    let rest = MockServer::start();
    let now = MockServer::start();

    let rest_mock = rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    let now_mock = now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(200).json_body(population_body("NOR"));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/NO?limit=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("YYYY-YYYY"));
    assert_eq!(rest_mock.hits(), 0);
    assert_eq!(now_mock.hits(), 0);
}

#[tokio::test]
async fn inverted_limit_is_a_400() {
    let rest = MockServer::start();
    let now = MockServer::start();

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/NO?limit=2015-2010").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("2015"));
}

#[tokio::test]
async fn unknown_country_code_is_a_404() {
    let rest = MockServer::start();
    let now = MockServer::start();

    // Empty array signals an unknown code.
    rest.mock(|when, then| {
        when.method(GET).path("/alpha/XX");
        then.status(200).json_body(serde_json::json!([]));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/XX").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("XX"));
}

#[tokio::test]
async fn country_without_iso3_is_a_500() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/ZZ");
        then.status(200)
            .json_body(serde_json::json!([{"name": {"common": "Testland"}}]));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/ZZ").await;

    // The country exists upstream but its record is damaged; that is not a
    // client-facing "not found".
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("ISO-3"));
}

#[tokio::test]
async fn missing_population_series_is_a_404() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(200)
            .json_body(serde_json::json!({"error": false, "msg": "ok", "data": []}));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/NO").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("NOR"));
}

#[tokio::test]
async fn empty_year_window_is_a_404() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(200).json_body(population_body("NOR"));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/population/NO?limit=1800-1801").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("1800-1801"));
}

#[tokio::test]
async fn upstream_server_error_is_a_500() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/population");
        then.status(500);
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, _) = get(&app, "/countryinfo/v1/population/NO").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn upstream_schema_mismatch_is_a_500() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).body("not json at all");
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, _) = get(&app, "/countryinfo/v1/population/NO").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn info_combines_lookup_and_cities() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/NO");
        then.status(200).json_body(norway_lookup_body());
    });
    // The city list is fetched by common name, not code.
    let cities_mock = now.mock(|when, then| {
        when.method(POST)
            .path("/countries/cities")
            .json_body(serde_json::json!({"country": "Norway"}));
        then.status(200).json_body(serde_json::json!({
            "error": false,
            "msg": "ok",
            "data": ["Oslo", "Bergen", "Trondheim"]
        }));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/info/NO").await;

    assert_eq!(status, StatusCode::OK);
    cities_mock.assert();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Norway",
            "continents": ["Europe"],
            "population": 5379475,
            "languages": {"nno": "Norwegian Nynorsk", "nob": "Norwegian Bokmål"},
            "borders": ["FIN", "SWE", "RUS"],
            "flag": "🇳🇴",
            "capital": "Oslo",
            "cities": ["Oslo", "Bergen", "Trondheim"]
        })
    );
}

#[tokio::test]
async fn info_defaults_capital_to_empty_string() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/AQ");
        then.status(200)
            .json_body(serde_json::json!([{"name": {"common": "Antarctica"}, "cca3": "ATA"}]));
    });
    now.mock(|when, then| {
        when.method(POST).path("/countries/cities");
        then.status(200)
            .json_body(serde_json::json!({"error": false, "msg": "ok", "data": []}));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/info/AQ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["capital"], "");
}

#[tokio::test]
async fn info_for_unknown_code_is_a_404() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/XX");
        then.status(200).json_body(serde_json::json!([]));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, _) = get(&app, "/countryinfo/v1/info/XX").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_reports_ok_when_both_probes_answer_200() {
    let rest = MockServer::start();
    let now = MockServer::start();

    // Default probe paths from config.
    rest.mock(|when, then| {
        when.method(GET).path("/alpha/no");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/iso");
        then.status(200)
            .json_body(serde_json::json!({"error": false, "msg": "ok", "data": []}));
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/status/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["countriesnowapi"], "OK");
    assert_eq!(json["restcountriesapi"], "OK");
    assert_eq!(json["version"], "v1");
    assert!(json["uptime"].is_u64());
}

#[tokio::test]
async fn status_carries_http_status_text_for_failing_probe() {
    let rest = MockServer::start();
    let now = MockServer::start();

    rest.mock(|when, then| {
        when.method(GET).path("/alpha/no");
        then.status(200).json_body(norway_lookup_body());
    });
    now.mock(|when, then| {
        when.method(GET).path("/countries/iso");
        then.status(503);
    });

    let app = app(rest.base_url(), now.base_url());
    let (status, json) = get(&app, "/countryinfo/v1/status/").await;

    // Probe failures never fail the status endpoint itself.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["restcountriesapi"], "OK");
    assert_eq!(
        json["countriesnowapi"],
        "Unavailable: 503 Service Unavailable"
    );
}
