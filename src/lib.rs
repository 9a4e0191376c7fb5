//! casemap turns cumulative per-municipality case counts into an animated choropleth
//! time series.
//!
//! # Pipeline overview
//!
//! 1. **Read**: the geography, population and case sources are read concurrently; nothing
//!    downstream runs until all three are in ([`read_inputs`]).
//! 2. **Parse**: text -> typed records ([`parse_case_table`], [`parse_population_table`],
//!    [`Geography::parse`]).
//! 3. **Difference**: cumulative totals -> daily deltas per municipality ([`difference`]).
//! 4. **Smooth**: forward-looking moving average ([`smooth`]).
//! 5. **Normalize**: cases per 100 000 residents ([`normalize`]).
//! 6. **Group**: one [`DayBucket`] per calendar day, ascending ([`TimeSeries::build`]).
//! 7. **Calibrate**: one [`ColorScale`] for the whole dataset.
//!
//! The result is an immutable [`Dataset`]. A [`PlaybackSession`] then drives which day is
//! shown; renderers ask the dataset for a [`Frame`] (fill color per region) and never touch
//! the raw data.
#![forbid(unsafe_code)]

mod foundation;
pub mod load;
pub mod parse;
pub mod pipeline;
pub mod playback;
pub mod scale;
pub mod timeline;
pub mod transform;

pub use foundation::config::{
    CasemapConfig, ColumnNames, MOVING_AVERAGE_WINDOW, PER_POPULATION, PipelineConfig,
    PlaybackConfig, ScaleConfig, TICK_DELAY_MS,
};
pub use foundation::core::{Lerp, Rgb8, area_code_to_municipality_code, round_half_up};
pub use foundation::error::{CasemapError, CasemapResult};
pub use load::{InputPaths, ParsedInputs, RawInputs, read_inputs};
pub use parse::{
    CaseTable, GeoFeature, Geography, PopulationRecord, RawCaseRecord, parse_case_table,
    parse_population_table,
};
pub use pipeline::{Dataset, Frame, PipelineReport, build_time_series};
pub use playback::{
    PlayState, PlaybackController, PlaybackSession, PlaybackState, TickToken, Ticker,
};
pub use scale::ColorScale;
pub use timeline::{SliderMark, day_label, progress_label, slider_marks};
pub use transform::{
    Cell, DailyValue, DayBucket, NormalizeReport, PopulationIndex, TimeSeries, difference,
    forward_moving_average, normalize, normalized_value, smooth,
};
