//! ISO-2 → ISO-3 country code resolution.

use tracing::{debug, instrument};

use crate::error::QueryError;
use crate::upstream::UpstreamClient;

/// Resolve a country code to its ISO-3 form via the metadata API.
///
/// Every call is a live upstream lookup; nothing is cached, so repeated
/// requests for the same code re-fetch. The upstream may disambiguate to
/// several matches, in which case index 0 is the deterministic pick.
#[instrument(skip(client), fields(code = %code))]
pub async fn resolve_iso3(client: &UpstreamClient, code: &str) -> Result<String, QueryError> {
    let countries = client
        .lookup_country(code)
        .await
        .map_err(|source| QueryError::Lookup {
            code: code.to_string(),
            source,
        })?;

    let record = countries
        .into_iter()
        .next()
        .ok_or_else(|| QueryError::CountryNotFound {
            code: code.to_string(),
        })?;

    let iso3 = record
        .iso3()
        .ok_or_else(|| QueryError::MissingIso3 {
            code: code.to_string(),
        })?
        .to_string();

    debug!(%iso3, "resolved country code");

    Ok(iso3)
}
