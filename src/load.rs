use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::info;

use crate::{
    foundation::{config::ColumnNames, error::CasemapResult},
    parse::{CaseTable, Geography, PopulationRecord, parse_case_table, parse_population_table},
};

/// Locations of the three inputs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InputPaths {
    pub geography: PathBuf,
    pub population: PathBuf,
    pub cases: PathBuf,
}

/// Unparsed input text. Only exists once every source has been read.
#[derive(Clone, Debug)]
pub struct RawInputs {
    pub geography: String,
    pub population: String,
    pub cases: String,
}

#[derive(Clone, Debug)]
pub struct ParsedInputs {
    pub geography: Geography,
    pub population: Vec<PopulationRecord>,
    pub cases: CaseTable,
}

fn read_text(path: &Path, what: &str) -> CasemapResult<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {what} '{}'", path.display()))?;
    Ok(text)
}

fn joined<T>(
    handle: std::thread::ScopedJoinHandle<'_, CasemapResult<T>>,
    what: &str,
) -> CasemapResult<T> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("{what} reader panicked"))?
}

/// Read all three sources concurrently.
///
/// Returns only after every read has finished; if any of them failed, the first failure
/// (geography, population, cases order) is returned and nothing is handed downstream.
#[tracing::instrument]
pub fn read_inputs(paths: &InputPaths) -> CasemapResult<RawInputs> {
    let (geography, population, cases) = std::thread::scope(|s| {
        let geography = s.spawn(|| read_text(&paths.geography, "geography"));
        let population = s.spawn(|| read_text(&paths.population, "population"));
        let cases = s.spawn(|| read_text(&paths.cases, "cases"));
        (
            joined(geography, "geography"),
            joined(population, "population"),
            joined(cases, "cases"),
        )
    });

    let raw = RawInputs {
        geography: geography?,
        population: population?,
        cases: cases?,
    };
    info!(
        geography_bytes = raw.geography.len(),
        population_bytes = raw.population.len(),
        case_bytes = raw.cases.len(),
        "inputs read"
    );
    Ok(raw)
}

impl RawInputs {
    pub fn parse(&self, columns: &ColumnNames) -> CasemapResult<ParsedInputs> {
        Ok(ParsedInputs {
            geography: Geography::parse(&self.geography)?,
            population: parse_population_table(&self.population, columns)?,
            cases: parse_case_table(&self.cases, columns)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::CasemapError;

    fn scratch(name: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("casemap-tests").join("load").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn all_three_are_read() {
        let dir = scratch("ok");
        std::fs::write(dir.join("geo.json"), "{\"features\":[]}").unwrap();
        std::fs::write(dir.join("pop.csv"), "Regions,PopulationOn31December_20\n").unwrap();
        std::fs::write(dir.join("cases.csv"), "a;b\n").unwrap();

        let raw = read_inputs(&InputPaths {
            geography: dir.join("geo.json"),
            population: dir.join("pop.csv"),
            cases: dir.join("cases.csv"),
        })
        .unwrap();
        assert!(raw.geography.contains("features"));
        assert!(raw.population.starts_with("Regions"));
        assert_eq!(raw.cases, "a;b\n");
    }

    #[test]
    fn one_missing_source_fails_the_whole_load() {
        let dir = scratch("missing");
        std::fs::write(dir.join("geo.json"), "{}").unwrap();
        std::fs::write(dir.join("pop.csv"), "x").unwrap();

        let err = read_inputs(&InputPaths {
            geography: dir.join("geo.json"),
            population: dir.join("pop.csv"),
            cases: dir.join("does-not-exist.csv"),
        })
        .unwrap_err();
        assert!(matches!(err, CasemapError::Other(_)));
        assert!(err.to_string().contains("cases"));
    }
}
