//! The population query pipeline.
//!
//! This module handles:
//! - ISO-2 → ISO-3 code resolution
//! - Year-range parsing and filtering
//! - Mean computation and the query orchestrator

pub mod filter;
pub mod query;
pub mod resolver;

pub use filter::{summarize, PopulationSummary, YearRange};
pub use query::population_for;
pub use resolver::resolve_iso3;
