//! Typed access to the two upstream APIs.
//!
//! This module handles:
//! - Wire schemas for both upstream response bodies
//! - The HTTP client issuing outbound calls and decoding JSON

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{CountryRecord, CountrySeries, PopulationRecord};
