//! Unified error types for the aggregation service.

use reqwest::StatusCode;
use thiserror::Error;

use crate::population::YearRange;

/// Errors from a single call to one of the upstream APIs.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The non-success status code.
        status: StatusCode,
    },

    /// The body did not match the expected schema.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        /// The URL that was requested.
        url: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

/// Failures in the population query pipeline and the info lookup.
///
/// Variant names carry the step that failed; wrapped sources preserve the
/// underlying kind so the API boundary can map not-found-class failures to
/// 404 and everything else to 500.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The country lookup call itself failed.
    #[error("looking up country {code}: {source}")]
    Lookup {
        /// The requested country code.
        code: String,
        /// Underlying upstream failure.
        #[source]
        source: UpstreamError,
    },

    /// The lookup succeeded but returned zero matches.
    #[error("no country found for code {code}")]
    CountryNotFound {
        /// The requested country code.
        code: String,
    },

    /// The matched country record has no ISO-3 code populated.
    #[error("country record for {code} is missing its ISO-3 code")]
    MissingIso3 {
        /// The requested country code.
        code: String,
    },

    /// The population fetch call itself failed.
    #[error("fetching population data: {source}")]
    Population {
        /// Underlying upstream failure.
        #[source]
        source: UpstreamError,
    },

    /// The population payload has no series for the resolved code.
    #[error("no population series found for {iso3}")]
    SeriesNotFound {
        /// The resolved ISO-3 code.
        iso3: String,
    },

    /// The city list call failed.
    #[error("fetching city list: {source}")]
    Cities {
        /// Underlying upstream failure.
        #[source]
        source: UpstreamError,
    },

    /// The country exists but the requested year window has no data.
    #[error("no population data for years {range}")]
    NoDataInRange {
        /// The requested year range.
        range: YearRange,
    },
}

impl QueryError {
    /// Whether this failure maps to a "not found" outward response.
    ///
    /// `MissingIso3` is deliberately excluded: the country exists upstream,
    /// its record is damaged, and that is a server-side condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QueryError::CountryNotFound { .. }
                | QueryError::SeriesNotFound { .. }
                | QueryError::NoDataInRange { .. }
        )
    }
}
