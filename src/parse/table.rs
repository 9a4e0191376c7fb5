use chrono::NaiveDate;
use tracing::debug;

use crate::{
    foundation::{
        config::ColumnNames,
        error::{CasemapError, CasemapResult},
    },
    parse::records::{CaseTable, PopulationRecord, RawCaseRecord},
};

/// Semicolon when the header uses only semicolons, comma otherwise.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

struct Table {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
}

impl Table {
    fn read(text: &str, what: &str) -> CasemapResult<Self> {
        if text.trim().is_empty() {
            return Err(CasemapError::parse(format!("{what} table is empty")));
        }
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(detect_delimiter(text))
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(text.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| CasemapError::parse(format!("{what} header: {e}")))?
            .clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CasemapError::parse(format!("{what} row: {e}")))?;
        Ok(Self { headers, rows })
    }

    fn column(&self, name: &str, what: &str) -> CasemapResult<usize> {
        self.headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| {
                CasemapError::parse(format!("{what} table is missing required column '{name}'"))
            })
    }
}

// Header is line 1.
fn line_of(row_idx: usize) -> usize {
    row_idx + 2
}

fn parse_report_date(raw: &str, line: usize) -> CasemapResult<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| {
        CasemapError::parse(format!("line {line}: '{raw}' is not a YYYY-MM-DD date"))
    })
}

fn parse_count(raw: &str, column: &str, line: usize) -> CasemapResult<u64> {
    raw.parse::<u64>().map_err(|_| {
        CasemapError::parse(format!(
            "line {line}: column '{column}' value '{raw}' is not a non-negative integer"
        ))
    })
}

/// Cumulative totals are differenced as signed values, so they must fit in an `i64`.
fn parse_total(raw: &str, column: &str, line: usize) -> CasemapResult<u64> {
    let total = parse_count(raw, column, line)?;
    if i64::try_from(total).is_err() {
        return Err(CasemapError::parse(format!(
            "line {line}: column '{column}' value '{raw}' is out of range"
        )));
    }
    Ok(total)
}

/// Parse the cumulative case table.
#[tracing::instrument(skip(text, columns), fields(bytes = text.len()))]
pub fn parse_case_table(text: &str, columns: &ColumnNames) -> CasemapResult<CaseTable> {
    let table = Table::read(text, "case")?;
    let date_col = table.column(&columns.report_date, "case")?;
    let code_col = table.column(&columns.municipality_code, "case")?;
    let total_col = table.column(&columns.cumulative_total, "case")?;

    let mut out = CaseTable::default();
    for (idx, row) in table.rows.iter().enumerate() {
        let line = line_of(idx);
        let code = row.get(code_col).unwrap_or_default();
        if code.is_empty() {
            out.skipped_rows += 1;
            continue;
        }
        let report_date = parse_report_date(row.get(date_col).unwrap_or_default(), line)?;
        let cumulative_total = match row.get(total_col).unwrap_or_default() {
            "" => None,
            raw => Some(parse_total(raw, &columns.cumulative_total, line)?),
        };
        out.records.push(RawCaseRecord {
            report_date,
            municipality_code: code.to_string(),
            cumulative_total,
        });
    }

    if out.records.is_empty() {
        return Err(CasemapError::parse("case table has no usable rows"));
    }
    debug!(
        records = out.records.len(),
        skipped = out.skipped_rows,
        "parsed case table"
    );
    Ok(out)
}

/// Parse the population reference table.
#[tracing::instrument(skip(text, columns), fields(bytes = text.len()))]
pub fn parse_population_table(
    text: &str,
    columns: &ColumnNames,
) -> CasemapResult<Vec<PopulationRecord>> {
    let table = Table::read(text, "population")?;
    let code_col = table.column(&columns.population_region, "population")?;
    let count_col = table.column(&columns.population_count, "population")?;

    let mut out = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let line = line_of(idx);
        let code = row.get(code_col).unwrap_or_default();
        if code.is_empty() {
            return Err(CasemapError::parse(format!(
                "line {line}: empty '{}' value",
                columns.population_region
            )));
        }
        let population = parse_count(
            row.get(count_col).unwrap_or_default(),
            &columns.population_count,
            line,
        )?;
        if population == 0 {
            return Err(CasemapError::parse(format!(
                "line {line}: population of '{code}' must be > 0"
            )));
        }
        out.push(PopulationRecord::new(code, population));
    }

    if out.is_empty() {
        return Err(CasemapError::parse("population table has no rows"));
    }
    debug!(records = out.len(), "parsed population table");
    Ok(out)
}
