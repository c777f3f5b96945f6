//! The population query orchestrator.

use tracing::instrument;

use crate::error::QueryError;
use crate::upstream::UpstreamClient;

use super::filter::{summarize, PopulationSummary, YearRange};
use super::resolver::resolve_iso3;

/// Run the full population pipeline: resolve code, fetch series, filter.
///
/// The fetch needs the resolver's output, so the two upstream calls are
/// sequential. Each step's failure short-circuits the rest; the result is
/// either a fully populated summary or an error, never a partial response.
#[instrument(skip(client), fields(code = %code, range = %range))]
pub async fn population_for(
    client: &UpstreamClient,
    code: &str,
    range: YearRange,
) -> Result<PopulationSummary, QueryError> {
    let iso3 = resolve_iso3(client, code).await?;
    let records = client.population_series(&iso3).await?;
    summarize(records, range)
}
