use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::{
    foundation::error::{CasemapError, CasemapResult},
    transform::{Cell, DailyValue},
};

/// All municipality values for one calendar day.
///
/// A present key with `None` is an explicit null; an absent key is "no data".
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub values_by_municipality: HashMap<String, Option<i64>>,
}

impl DayBucket {
    pub fn cell(&self, municipality_code: &str) -> Cell {
        match self.values_by_municipality.get(municipality_code) {
            Some(Some(v)) => Cell::Value(*v),
            Some(None) => Cell::Null,
            None => Cell::NoData,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.values_by_municipality.values().filter_map(|v| *v)
    }
}

/// Day buckets sorted ascending by date, one per distinct report date.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TimeSeries {
    days: Vec<DayBucket>,
}

impl TimeSeries {
    /// Regroup normalized records by report date.
    ///
    /// Every distinct date gets a bucket, even when none of its records could be normalized.
    #[tracing::instrument(skip(values), fields(values = values.len()))]
    pub fn build(values: &[DailyValue]) -> Self {
        let mut grouped: BTreeMap<NaiveDate, HashMap<String, Option<i64>>> = BTreeMap::new();
        for v in values {
            let day = grouped.entry(v.report_date).or_default();
            match v.normalized {
                Cell::Value(n) => {
                    day.insert(v.municipality_code.clone(), Some(n));
                }
                Cell::Null => {
                    day.insert(v.municipality_code.clone(), None);
                }
                Cell::NoData => {}
            }
        }

        Self {
            days: grouped
                .into_iter()
                .map(|(date, values_by_municipality)| DayBucket {
                    date,
                    values_by_municipality,
                })
                .collect(),
        }
    }

    pub fn number_of_days(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &[DayBucket] {
        &self.days
    }

    pub fn day(&self, index: usize) -> CasemapResult<&DayBucket> {
        self.days
            .get(index)
            .ok_or_else(|| CasemapError::out_of_range(index, self.days.len()))
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.binary_search_by_key(&date, |d| d.date).ok()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    /// Every present value, across all days and municipalities.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.days.iter().flat_map(DayBucket::values)
    }
}
