use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::Rgb8,
    error::{CasemapError, CasemapResult},
};

/// Cases per this many residents.
pub const PER_POPULATION: u64 = 100_000;
/// Forward-looking moving average window, in records.
pub const MOVING_AVERAGE_WINDOW: usize = 14;
/// Delay between playback ticks.
pub const TICK_DELAY_MS: u64 = 50;

/// Full runtime configuration. Every field has a default, so a partial JSON file is valid.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CasemapConfig {
    pub columns: ColumnNames,
    pub pipeline: PipelineConfig,
    pub scale: ScaleConfig,
    pub playback: PlaybackConfig,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub report_date: String,
    pub municipality_code: String,
    pub cumulative_total: String,
    pub population_region: String,
    pub population_count: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            report_date: "Date_of_report".to_string(),
            municipality_code: "Municipality_code".to_string(),
            cumulative_total: "Total_reported".to_string(),
            population_region: "Regions".to_string(),
            population_count: "PopulationOn31December_20".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub per_population: u64,
    pub moving_average_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            per_population: PER_POPULATION,
            moving_average_window: MOVING_AVERAGE_WINDOW,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub low: Rgb8,
    pub mid: Rgb8,
    pub high: Rgb8,
    pub no_data: Rgb8,
    pub null_data: Rgb8,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            low: Rgb8::WHITE,
            mid: Rgb8::ORANGE,
            high: Rgb8::RED,
            no_data: Rgb8::GRAY,
            null_data: Rgb8::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_delay_ms: TICK_DELAY_MS,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_delay(self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_delay_ms)
    }
}

impl CasemapConfig {
    pub fn from_path(path: &Path) -> CasemapResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> CasemapResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| CasemapError::serde(format!("config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CasemapResult<()> {
        if self.pipeline.per_population == 0 {
            return Err(CasemapError::validation("pipeline.per_population must be > 0"));
        }
        if self.pipeline.moving_average_window == 0 {
            return Err(CasemapError::validation(
                "pipeline.moving_average_window must be > 0",
            ));
        }
        if self.playback.tick_delay_ms == 0 {
            return Err(CasemapError::validation("playback.tick_delay_ms must be > 0"));
        }
        let columns = [
            &self.columns.report_date,
            &self.columns.municipality_code,
            &self.columns.cumulative_total,
            &self.columns.population_region,
            &self.columns.population_count,
        ];
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(CasemapError::validation("column names must be non-empty"));
        }
        Ok(())
    }
}
