use chrono::NaiveDate;

/// One row of the cumulative case table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawCaseRecord {
    pub report_date: NaiveDate,
    pub municipality_code: String,
    /// `None` is an explicit null in the source (empty cell).
    pub cumulative_total: Option<u64>,
}

impl RawCaseRecord {
    pub fn new(
        report_date: NaiveDate,
        municipality_code: impl Into<String>,
        cumulative_total: u64,
    ) -> Self {
        Self {
            report_date,
            municipality_code: municipality_code.into(),
            cumulative_total: Some(cumulative_total),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PopulationRecord {
    pub municipality_code: String,
    pub population: u64, // > 0
}

impl PopulationRecord {
    pub fn new(municipality_code: impl Into<String>, population: u64) -> Self {
        Self {
            municipality_code: municipality_code.into(),
            population,
        }
    }
}

/// Parsed case table plus the number of rows dropped for having no municipality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaseTable {
    pub records: Vec<RawCaseRecord>,
    pub skipped_rows: usize,
}
