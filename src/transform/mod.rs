//! Cumulative counts -> per-day, per-capita, smoothed values.
//!
//! Stages run in order and each one fills in one more field of [`DailyValue`]:
//!
//! 1. [`diff::difference`]: `daily_delta`
//! 2. [`smooth::smooth`]: `smoothed_delta`
//! 3. [`normalize::normalize`]: `normalized`
//! 4. [`days::TimeSeries::build`]: regroup by calendar day

pub mod days;
pub mod diff;
pub mod normalize;
pub mod smooth;

use chrono::NaiveDate;

/// What a region shows on a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Cell {
    Value(i64),
    /// Present in the source, but the cumulative total was empty.
    Null,
    /// No record for this region and day, or the record could not be normalized.
    NoData,
}

impl Cell {
    pub fn value(self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Null | Self::NoData => None,
        }
    }
}

/// One derived record per input record. Immutable once the pipeline has run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyValue {
    pub report_date: NaiveDate,
    pub municipality_code: String,
    pub daily_delta: Option<i64>,    // None for explicit nulls
    pub smoothed_delta: Option<f64>, // filled by smoothing
    pub normalized: Cell,            // NoData until normalized
}

impl DailyValue {
    pub fn stub(
        report_date: NaiveDate,
        municipality_code: impl Into<String>,
        daily_delta: Option<i64>,
    ) -> Self {
        Self {
            report_date,
            municipality_code: municipality_code.into(),
            daily_delta,
            smoothed_delta: None,
            normalized: Cell::NoData,
        }
    }
}

pub use days::{DayBucket, TimeSeries};
pub use diff::difference;
pub use normalize::{NormalizeReport, PopulationIndex, normalize, normalized_value};
pub use smooth::{forward_moving_average, smooth};
