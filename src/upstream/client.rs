//! HTTP client for the two upstream APIs.

use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{QueryError, UpstreamError};
use crate::metrics;

use super::types::{
    CitiesEnvelope, CitiesQuery, CountryRecord, CountrySeries, PopulationEnvelope,
    PopulationRecord,
};

/// Client for the REST Countries and CountriesNow APIs.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for the REST Countries API.
    restcountries_url: String,
    /// Base URL for the CountriesNow API.
    countriesnow_url: String,
}

impl UpstreamClient {
    /// Create a new client from config with tuned HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            restcountries_url: config.restcountries_api_url.trim_end_matches('/').to_string(),
            countriesnow_url: config.countriesnow_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the HTTP client reference.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Base URL of the REST Countries API.
    pub fn restcountries_url(&self) -> &str {
        &self.restcountries_url
    }

    /// Base URL of the CountriesNow API.
    pub fn countriesnow_url(&self) -> &str {
        &self.countriesnow_url
    }

    /// Look up country records by ISO-2 or ISO-3 code.
    ///
    /// An empty result signals an unknown code; the upstream may in principle
    /// return several matches, so callers pick.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn lookup_country(&self, code: &str) -> Result<Vec<CountryRecord>, UpstreamError> {
        let url = format!("{}/alpha/{}", self.restcountries_url, code);
        self.get_json("restcountries", &url).await
    }

    /// Fetch the population series for every country in one payload.
    pub async fn all_population_series(&self) -> Result<Vec<CountrySeries>, UpstreamError> {
        let url = format!("{}/countries/population", self.countriesnow_url);
        let envelope: PopulationEnvelope = self.get_json("countriesnow", &url).await?;
        Ok(envelope.data)
    }

    /// Fetch the population series for one country by ISO-3 code.
    ///
    /// The upstream only serves the full collection, so this is a linear scan
    /// over the payload with a case-insensitive exact match.
    #[instrument(skip(self), fields(iso3 = %iso3))]
    pub async fn population_series(&self, iso3: &str) -> Result<Vec<PopulationRecord>, QueryError> {
        let all = self
            .all_population_series()
            .await
            .map_err(|source| QueryError::Population { source })?;

        let series = all
            .into_iter()
            .find(|series| series.iso3.eq_ignore_ascii_case(iso3))
            .ok_or_else(|| QueryError::SeriesNotFound {
                iso3: iso3.to_string(),
            })?;

        debug!(
            country = %series.country,
            records = series.population_counts.len(),
            "found population series"
        );

        Ok(series.population_counts)
    }

    /// Fetch the city list for a country by its common name.
    #[instrument(skip(self), fields(country = %country_name))]
    pub async fn cities(&self, country_name: &str) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/countries/cities", self.countriesnow_url);
        let body = CitiesQuery {
            country: country_name.to_string(),
        };

        let envelope: CitiesEnvelope = self.post_json("countriesnow", &url, &body).await?;
        Ok(envelope.data)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        upstream: &'static str,
        url: &str,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();

        let response = self.http.get(url).send().await.map_err(|source| {
            metrics::inc_upstream_failure(upstream);
            UpstreamError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        metrics::record_upstream_latency(start, upstream);

        if !response.status().is_success() {
            metrics::inc_upstream_failure(upstream);
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.json::<T>().await.map_err(|source| {
            metrics::inc_upstream_failure(upstream);
            UpstreamError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }

    /// Issue a POST with a JSON body and decode the JSON response.
    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        upstream: &'static str,
        url: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| {
                metrics::inc_upstream_failure(upstream);
                UpstreamError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;

        metrics::record_upstream_latency(start, upstream);

        if !response.status().is_success() {
            metrics::inc_upstream_failure(upstream);
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.json::<T>().await.map_err(|source| {
            metrics::inc_upstream_failure(upstream);
            UpstreamError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_strips_trailing_slashes() {
        let config = Config {
            restcountries_api_url: "http://localhost:8081/v3.1/".to_string(),
            countriesnow_api_url: "http://localhost:3500/api/v0.1/".to_string(),
            ..Config::default()
        };

        let client = UpstreamClient::new(&config);
        assert_eq!(client.restcountries_url(), "http://localhost:8081/v3.1");
        assert_eq!(client.countriesnow_url(), "http://localhost:3500/api/v0.1");
    }
}
