//! Wire schemas for the upstream APIs.
//!
//! Every endpoint gets an explicit response type rather than a dynamic map,
//! so a field the upstream drops shows up as a decode failure or a default,
//! never as a silently serialized null.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single year's population figure.
///
/// Produced by the gateway from the CountriesNow payload and reused verbatim
/// in the outward population response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    /// Year of the record.
    pub year: i32,
    /// Population value for that year.
    pub value: i64,
}

/// Country name object from the REST Countries API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryName {
    /// Common name of the country.
    #[serde(default)]
    pub common: String,
    /// Official name of the country.
    #[serde(default)]
    pub official: String,
}

/// Country record from `GET {rest}/alpha/{code}`.
///
/// The upstream returns an array of these; an empty array signals an unknown
/// code. Fields the upstream sometimes omits (borders for islands, capital
/// for territories) default to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    /// Name object.
    #[serde(default)]
    pub name: CountryName,
    /// ISO-2 country code.
    #[serde(default)]
    pub cca2: String,
    /// ISO-3 country code. Absent or empty in damaged records.
    #[serde(default)]
    pub cca3: Option<String>,
    /// Current population.
    #[serde(default)]
    pub population: i64,
    /// Languages spoken, keyed by language code.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    /// Continents the country belongs to.
    #[serde(default)]
    pub continents: Vec<String>,
    /// Bordering countries (ISO-3 codes).
    #[serde(default)]
    pub borders: Vec<String>,
    /// Flag emoji or URL.
    #[serde(default)]
    pub flag: String,
    /// Capital cities.
    #[serde(default)]
    pub capital: Vec<String>,
}

impl CountryRecord {
    /// The ISO-3 code, treating an empty string the same as absent.
    pub fn iso3(&self) -> Option<&str> {
        self.cca3.as_deref().filter(|code| !code.is_empty())
    }
}

/// Envelope around `GET {now}/countries/population`.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationEnvelope {
    /// Upstream error flag.
    #[serde(default)]
    pub error: bool,
    /// Upstream message.
    #[serde(default)]
    pub msg: String,
    /// Population series for every country in one payload.
    #[serde(default)]
    pub data: Vec<CountrySeries>,
}

/// Population series for one country.
#[derive(Debug, Clone, Deserialize)]
pub struct CountrySeries {
    /// Country name.
    #[serde(default)]
    pub country: String,
    /// ISO-2 country code.
    #[serde(default)]
    pub code: String,
    /// ISO-3 country code.
    #[serde(default)]
    pub iso3: String,
    /// Year-by-year population records.
    #[serde(default, rename = "populationCounts")]
    pub population_counts: Vec<PopulationRecord>,
}

/// Request body for `POST {now}/countries/cities`.
#[derive(Debug, Clone, Serialize)]
pub struct CitiesQuery {
    /// Country name as the upstream expects it.
    pub country: String,
}

/// Envelope around the cities response.
#[derive(Debug, Clone, Deserialize)]
pub struct CitiesEnvelope {
    /// Upstream error flag.
    #[serde(default)]
    pub error: bool,
    /// Upstream message.
    #[serde(default)]
    pub msg: String,
    /// City names.
    #[serde(default)]
    pub data: Vec<String>,
}
