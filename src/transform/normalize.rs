use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::{
    foundation::{
        core::round_half_up,
        error::{CasemapError, CasemapResult},
    },
    parse::PopulationRecord,
    transform::{Cell, DailyValue},
};

/// Municipality code -> population. Later records win on duplicate codes.
#[derive(Clone, Debug, Default)]
pub struct PopulationIndex {
    by_code: HashMap<String, u64>,
}

impl PopulationIndex {
    pub fn from_records(records: &[PopulationRecord]) -> Self {
        Self {
            by_code: records
                .iter()
                .map(|r| (r.municipality_code.clone(), r.population))
                .collect(),
        }
    }

    pub fn get(&self, municipality_code: &str) -> CasemapResult<u64> {
        self.by_code
            .get(municipality_code)
            .copied()
            .ok_or_else(|| CasemapError::missing_population(municipality_code))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// `round(smoothed / population * per_population)`.
pub fn normalized_value(smoothed: f64, population: u64, per_population: u64) -> i64 {
    round_half_up(smoothed / population as f64 * per_population as f64) as i64
}

/// Records that could not be normalized, per municipality.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct NormalizeReport {
    pub missing_population: BTreeMap<String, usize>,
}

impl NormalizeReport {
    pub fn missing_records(&self) -> usize {
        self.missing_population.values().sum()
    }
}

fn normalize_one(
    value: &DailyValue,
    populations: &PopulationIndex,
    per_population: u64,
) -> CasemapResult<Cell> {
    let population = populations.get(&value.municipality_code)?;
    let Some(smoothed) = value.smoothed_delta else {
        return Ok(Cell::Null);
    };
    Ok(Cell::Value(normalized_value(
        smoothed,
        population,
        per_population,
    )))
}

/// Fill `normalized` for every record.
///
/// A missing population is not fatal: the record becomes [`Cell::NoData`] and is counted in
/// the returned report.
#[tracing::instrument(skip(values, populations), fields(values = values.len()))]
pub fn normalize(
    values: &mut [DailyValue],
    populations: &PopulationIndex,
    per_population: u64,
) -> CasemapResult<NormalizeReport> {
    let mut report = NormalizeReport::default();
    for v in values.iter_mut() {
        v.normalized = match normalize_one(v, populations, per_population) {
            Ok(cell) => cell,
            Err(CasemapError::MissingPopulation { municipality_code }) => {
                *report
                    .missing_population
                    .entry(municipality_code)
                    .or_default() += 1;
                Cell::NoData
            }
            Err(e) => return Err(e),
        };
    }

    for (code, count) in &report.missing_population {
        warn!(municipality = %code, records = count, "no population; rendered as no data");
    }
    Ok(report)
}
