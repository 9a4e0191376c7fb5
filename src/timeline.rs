use chrono::{Datelike as _, NaiveDate};

use crate::transform::TimeSeries;

/// Labelled position on the day slider.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SliderMark {
    pub value: usize,
    pub label: String,
}

const MID_YEAR_ORDINAL: u32 = 181;

/// Marks at the first day of every year, and optionally at mid-year (day 181).
pub fn slider_marks(series: &TimeSeries, include_mid_year: bool) -> Vec<SliderMark> {
    series
        .days()
        .iter()
        .enumerate()
        .filter(|(_, day)| {
            let ordinal = day.date.ordinal();
            ordinal == 1 || (include_mid_year && ordinal == MID_YEAR_ORDINAL)
        })
        .map(|(value, day)| SliderMark {
            value,
            label: day.date.format("%b %Y").to_string(),
        })
        .collect()
}

/// `05 Mar, 2021`
pub fn day_label(date: NaiveDate) -> String {
    date.format("%d %b, %Y").to_string()
}

/// `Day 1 of 365`
pub fn progress_label(index: usize, number_of_days: usize) -> String {
    format!("Day {} of {}", index + 1, number_of_days)
}
