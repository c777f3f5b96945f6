//! Year-range filtering and mean computation. Pure, no I/O.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::error::QueryError;
use crate::upstream::PopulationRecord;

/// An optional inclusive year window.
///
/// `None` on either side means unbounded on that side; the default value is
/// unbounded on both. `start <= end` is enforced at parse time, so a
/// constructed range is always valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    /// Inclusive lower bound.
    pub start: Option<i32>,
    /// Inclusive upper bound.
    pub end: Option<i32>,
}

impl YearRange {
    /// Whether a year falls inside the window.
    pub fn contains(&self, year: i32) -> bool {
        self.start.map_or(true, |start| year >= start)
            && self.end.map_or(true, |end| year <= end)
    }

    /// Whether the range has no bounds at all.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "{}-{}", start, end),
            (Some(start), None) => write!(f, "{}-", start),
            (None, Some(end)) => write!(f, "-{}", end),
            (None, None) => write!(f, "any year"),
        }
    }
}

/// Failure to parse a `limit=YYYY-YYYY` query parameter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseYearRangeError {
    /// Not exactly two dash-separated integers.
    #[error("year range must be two dash-separated integers")]
    Malformed,

    /// Both bounds parsed but in the wrong order.
    #[error("year range start {start} is after end {end}")]
    Inverted {
        /// Parsed start year.
        start: i32,
        /// Parsed end year.
        end: i32,
    },
}

impl FromStr for YearRange {
    type Err = ParseYearRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (Some(raw_start), Some(raw_end), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseYearRangeError::Malformed);
        };

        let start: i32 = raw_start.parse().map_err(|_| ParseYearRangeError::Malformed)?;
        let end: i32 = raw_end.parse().map_err(|_| ParseYearRangeError::Malformed)?;

        if start > end {
            return Err(ParseYearRangeError::Inverted { start, end });
        }

        Ok(YearRange {
            start: Some(start),
            end: Some(end),
        })
    }
}

/// Filtered population records with their arithmetic mean.
///
/// Only ever constructed with non-empty `values`; an empty match set is a
/// [`QueryError::NoDataInRange`], never a zero-valued summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationSummary {
    /// Mean of the kept values, truncated to an integer.
    pub mean: i64,
    /// The kept records, in their original order.
    pub values: Vec<PopulationRecord>,
}

/// Select the records inside `range` and compute their mean.
///
/// Iterates in the given order and keeps that order; no sorting. The mean is
/// `sum / count` in integer arithmetic, truncating toward zero.
pub fn summarize(
    records: Vec<PopulationRecord>,
    range: YearRange,
) -> Result<PopulationSummary, QueryError> {
    let values: Vec<PopulationRecord> = records
        .into_iter()
        .filter(|record| range.contains(record.year))
        .collect();

    if values.is_empty() {
        return Err(QueryError::NoDataInRange { range });
    }

    let sum: i64 = values.iter().map(|record| record.value).sum();
    let mean = sum / values.len() as i64;

    Ok(PopulationSummary { mean, values })
}
