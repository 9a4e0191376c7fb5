use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;

use crate::{
    foundation::{
        config::{CasemapConfig, PipelineConfig},
        core::Rgb8,
        error::{CasemapError, CasemapResult},
    },
    load::{InputPaths, ParsedInputs, RawInputs, read_inputs},
    parse::{CaseTable, Geography, PopulationRecord},
    playback::PlaybackSession,
    scale::ColorScale,
    timeline::{SliderMark, day_label, slider_marks},
    transform::{
        NormalizeReport, PopulationIndex, TimeSeries, difference, normalize, smooth,
    },
};

/// Counts gathered while building a [`Dataset`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PipelineReport {
    pub case_records: usize,
    pub skipped_rows: usize,
    pub municipalities: usize,
    pub number_of_days: usize,
    pub normalize: NormalizeReport,
}

/// Run differencing, smoothing, normalization and day grouping over parsed records.
///
/// Fails only on structural problems (no case records). Missing populations are absorbed
/// and reported.
#[tracing::instrument(skip_all, fields(records = cases.records.len()))]
pub fn build_time_series(
    cases: &CaseTable,
    population: &[PopulationRecord],
    config: &PipelineConfig,
) -> CasemapResult<(TimeSeries, PipelineReport)> {
    if cases.records.is_empty() {
        return Err(CasemapError::parse("no case records to process"));
    }

    let populations = PopulationIndex::from_records(population);
    let mut values = difference(&cases.records);
    smooth(&mut values, config.moving_average_window);
    let normalized = normalize(&mut values, &populations, config.per_population)?;
    let series = TimeSeries::build(&values);

    let mut municipalities: Vec<&str> = values
        .iter()
        .map(|v| v.municipality_code.as_str())
        .collect();
    municipalities.dedup();

    let report = PipelineReport {
        case_records: cases.records.len(),
        skipped_rows: cases.skipped_rows,
        municipalities: municipalities.len(),
        number_of_days: series.number_of_days(),
        normalize: normalized,
    };
    Ok((series, report))
}

/// Colors for every region on one day: what a renderer needs per frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Frame {
    pub day_index: usize,
    pub date: NaiveDate,
    pub label: String,
    pub fills: BTreeMap<String, Rgb8>,
}

/// Immutable result of loading: geography, time series and color scale.
#[derive(Clone, Debug)]
pub struct Dataset {
    geography: Geography,
    series: TimeSeries,
    scale: ColorScale,
    report: PipelineReport,
}

impl Dataset {
    /// Read, parse and transform all inputs.
    pub fn load(paths: &InputPaths, config: &CasemapConfig) -> CasemapResult<Self> {
        config.validate()?;
        let raw = read_inputs(paths)?;
        Self::from_raw(&raw, config)
    }

    pub fn from_raw(raw: &RawInputs, config: &CasemapConfig) -> CasemapResult<Self> {
        let parsed = raw.parse(&config.columns)?;
        Self::from_parsed(parsed, config)
    }

    pub fn from_parsed(parsed: ParsedInputs, config: &CasemapConfig) -> CasemapResult<Self> {
        let (series, report) =
            build_time_series(&parsed.cases, &parsed.population, &config.pipeline)?;
        let scale = ColorScale::from_series(&series, &config.scale);
        info!(
            days = report.number_of_days,
            municipalities = report.municipalities,
            missing_population_records = report.normalize.missing_records(),
            "dataset ready"
        );
        Ok(Self {
            geography: parsed.geography,
            series,
            scale,
            report,
        })
    }

    pub fn geography(&self) -> &Geography {
        &self.geography
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn report(&self) -> &PipelineReport {
        &self.report
    }

    pub fn number_of_days(&self) -> usize {
        self.series.number_of_days()
    }

    pub fn slider_marks(&self, include_mid_year: bool) -> Vec<SliderMark> {
        slider_marks(&self.series, include_mid_year)
    }

    /// Fill color for every geography feature on `day_index`.
    pub fn frame(&self, day_index: usize) -> CasemapResult<Frame> {
        let day = self.series.day(day_index)?;
        let fills = self
            .geography
            .features()
            .iter()
            .map(|f| {
                let code = f.municipality_code();
                let color = self.scale.color_for_cell(day.cell(&code));
                (code, color)
            })
            .collect();
        Ok(Frame {
            day_index,
            date: day.date,
            label: day_label(day.date),
            fills,
        })
    }

    pub fn playback_session(&self, config: &CasemapConfig) -> CasemapResult<PlaybackSession> {
        PlaybackSession::new(self.number_of_days(), config.playback.tick_delay())
    }
}
