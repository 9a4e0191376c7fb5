use crate::transform::DailyValue;

/// Mean of `deltas[i..min(i + window, len)]` for every `i`.
///
/// The window looks forward and shrinks near the end, so the last element is always the last
/// delta itself. A `window` of 0 is treated as 1.
pub fn forward_moving_average(deltas: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let len = deltas.len();
    (0..len)
        .map(|i| {
            let end = (i + window).min(len);
            let span = &deltas[i..end];
            span.iter().sum::<f64>() / span.len() as f64
        })
        .collect()
}

/// Fill `smoothed_delta` for every record with a delta.
///
/// `values` must be grouped by municipality and date-sorted within each group, as produced
/// by [`difference`](crate::transform::difference). Null records are left out of the window.
#[tracing::instrument(skip(values), fields(values = values.len()))]
pub fn smooth(values: &mut [DailyValue], window: usize) {
    for group in values.chunk_by_mut(|a, b| a.municipality_code == b.municipality_code) {
        let deltas: Vec<f64> = group
            .iter()
            .filter_map(|v| v.daily_delta)
            .map(|d| d as f64)
            .collect();
        let mut averaged = forward_moving_average(&deltas, window).into_iter();
        for v in group.iter_mut().filter(|v| v.daily_delta.is_some()) {
            v.smoothed_delta = averaged.next();
        }
    }
}
