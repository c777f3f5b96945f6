//! HTTP API handlers.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::QueryError;
use crate::metrics;
use crate::population::{population_for, PopulationSummary, YearRange};
use crate::status::{probe, ProbeStatus};
use crate::upstream::UpstreamClient;

/// Version string reported by the status endpoint.
pub const API_VERSION: &str = "v1";

/// Usage hint attached to malformed `limit` parameters.
pub const LIMIT_USAGE: &str =
    "expected two dash-separated years in YYYY-YYYY form, e.g. ?limit=2010-2015";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the two upstream APIs.
    pub client: UpstreamClient,
    /// Loaded configuration (probe paths and timeouts).
    pub config: Config,
    /// Process start instant, recorded once.
    pub started: Instant,
    /// Prometheus render handle, present when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: UpstreamClient::new(config),
            config: config.clone(),
            started: Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus render handle for the /metrics route.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.config.probe_timeout_secs)
    }
}

/// Error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure detail.
    pub error: String,
}

/// Failures mapped to outward HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed inbound input; reported before any network call.
    BadRequest(String),
    /// Upstream has no record for the request.
    NotFound(String),
    /// Everything else.
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Combined country and city information.
#[derive(Debug, Serialize)]
pub struct CountryInfoResponse {
    /// Common name of the country.
    pub name: String,
    /// Continents the country belongs to.
    pub continents: Vec<String>,
    /// Current population.
    pub population: i64,
    /// Languages spoken, keyed by language code.
    pub languages: BTreeMap<String, String>,
    /// Bordering countries (ISO-3 codes).
    pub borders: Vec<String>,
    /// Flag emoji or URL.
    pub flag: String,
    /// First capital city, empty when the upstream has none.
    pub capital: String,
    /// City names from the cities API.
    pub cities: Vec<String>,
}

/// Aggregate service status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// CountriesNow API probe outcome.
    pub countriesnowapi: ProbeStatus,
    /// REST Countries API probe outcome.
    pub restcountriesapi: ProbeStatus,
    /// API version string.
    pub version: &'static str,
    /// Whole seconds since process start.
    pub uptime: u64,
}

/// Query parameters for the population endpoint.
#[derive(Debug, Deserialize)]
pub struct PopulationParams {
    /// Optional `YYYY-YYYY` year window.
    pub limit: Option<String>,
}

/// Country info handler: metadata lookup plus city list, remapped.
pub async fn info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CountryInfoResponse>, ApiError> {
    metrics::inc_requests_served("info");

    let code = code.trim().to_uppercase();

    let countries = state
        .client
        .lookup_country(&code)
        .await
        .map_err(|source| QueryError::Lookup {
            code: code.clone(),
            source,
        })?;

    let record = countries
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::CountryNotFound { code: code.clone() })?;

    let cities = state
        .client
        .cities(&record.name.common)
        .await
        .map_err(|source| QueryError::Cities { source })?;

    let capital = record.capital.into_iter().next().unwrap_or_default();

    Ok(Json(CountryInfoResponse {
        name: record.name.common,
        continents: record.continents,
        population: record.population,
        languages: record.languages,
        borders: record.borders,
        flag: record.flag,
        capital,
        cities,
    }))
}

/// Population handler: parse the year window, then run the query pipeline.
pub async fn population(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<PopulationParams>,
) -> Result<Json<PopulationSummary>, ApiError> {
    metrics::inc_requests_served("population");

    // Input validation happens before any outbound call.
    let range = match params.limit.as_deref() {
        None | Some("") => YearRange::default(),
        Some(raw) => raw.parse::<YearRange>().map_err(|err| {
            ApiError::BadRequest(format!("invalid limit parameter: {}; {}", err, LIMIT_USAGE))
        })?,
    };

    let code = code.trim().to_uppercase();
    let summary = population_for(&state.client, &code, range).await?;

    Ok(Json(summary))
}

/// Status handler: probe both upstreams and report uptime.
///
/// The two probes have no data dependency and run concurrently. This handler
/// always answers 200; probe failures live inside the body.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    metrics::inc_requests_served("status");

    let timeout = state.probe_timeout();

    let (countriesnowapi, restcountriesapi) = tokio::join!(
        probe(
            state.client.http(),
            state.client.countriesnow_url(),
            &state.config.countriesnow_probe_path,
            timeout,
        ),
        probe(
            state.client.http(),
            state.client.restcountries_url(),
            &state.config.restcountries_probe_path,
            timeout,
        ),
    );

    Json(StatusResponse {
        countriesnowapi,
        restcountriesapi,
        version: API_VERSION,
        uptime: state.started.elapsed().as_secs(),
    })
}

/// Prometheus exposition handler; 404 when no recorder is installed.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
