use crate::{
    foundation::{
        config::ScaleConfig,
        core::{Lerp, Rgb8},
    },
    transform::{Cell, TimeSeries},
};

/// Piecewise-linear value -> color mapping over `[low, mid, high]`, plus two out-of-domain
/// sentinels for regions without a value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorScale {
    pub domain_low: f64,
    pub domain_mid: f64,
    pub domain_high: f64,
    pub color_low: Rgb8,
    pub color_mid: Rgb8,
    pub color_high: Rgb8,
    pub no_data: Rgb8,
    pub null_data: Rgb8,
}

/// Smallest multiple of 100 at or above `max`, never below 0.
fn ceil_to_hundred(max: f64) -> f64 {
    (100.0 * (max / 100.0).ceil()).max(0.0)
}

impl ColorScale {
    /// Derive the domain from every value in the dataset.
    ///
    /// `high` is the maximum rounded up to the next 100 and `mid` is the arithmetic mean,
    /// clamped into `[0, high]`. An empty or all non-positive dataset collapses the domain
    /// to zero and the scale becomes a constant.
    pub fn calibrate(values: impl IntoIterator<Item = i64>, colors: &ScaleConfig) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0f64;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            let v = v as f64;
            count += 1;
            sum += v;
            max = max.max(v);
        }

        let (mid, high) = if count == 0 {
            (0.0, 0.0)
        } else {
            let high = ceil_to_hundred(max);
            ((sum / count as f64).clamp(0.0, high), high)
        };

        Self {
            domain_low: 0.0,
            domain_mid: mid,
            domain_high: high,
            color_low: colors.low,
            color_mid: colors.mid,
            color_high: colors.high,
            no_data: colors.no_data,
            null_data: colors.null_data,
        }
    }

    #[tracing::instrument(skip(series, colors))]
    pub fn from_series(series: &TimeSeries, colors: &ScaleConfig) -> Self {
        let scale = Self::calibrate(series.values(), colors);
        tracing::debug!(
            low = scale.domain_low,
            mid = scale.domain_mid,
            high = scale.domain_high,
            "calibrated color scale"
        );
        scale
    }

    pub fn domain(&self) -> [f64; 3] {
        [self.domain_low, self.domain_mid, self.domain_high]
    }

    pub fn is_degenerate(&self) -> bool {
        self.domain_high <= self.domain_low
    }

    /// Color for an in-domain value. Values outside the domain clamp to the end colors.
    pub fn color_for(&self, value: f64) -> Rgb8 {
        if self.is_degenerate() || value.is_nan() || value <= self.domain_low {
            return self.color_low;
        }
        if value >= self.domain_high {
            return self.color_high;
        }
        if value < self.domain_mid {
            let t = (value - self.domain_low) / (self.domain_mid - self.domain_low);
            return Rgb8::lerp(&self.color_low, &self.color_mid, t);
        }
        let span = self.domain_high - self.domain_mid;
        if span <= 0.0 {
            return self.color_high;
        }
        Rgb8::lerp(&self.color_mid, &self.color_high, (value - self.domain_mid) / span)
    }

    pub fn color_for_cell(&self, cell: Cell) -> Rgb8 {
        match cell {
            Cell::Value(v) => self.color_for(v as f64),
            Cell::Null => self.null_data,
            Cell::NoData => self.no_data,
        }
    }

    /// Evenly spaced legend samples from `high` down to `low`, each with its color.
    pub fn legend_stops(&self, steps: usize) -> Vec<(f64, Rgb8)> {
        let steps = steps.max(1);
        let mut values = Vec::with_capacity(steps + 1);
        if !self.is_degenerate() {
            let step = (self.domain_high - self.domain_low) / steps as f64;
            values.extend((0..steps).map(|i| self.domain_low + step * i as f64));
        }
        values.push(self.domain_high);
        values
            .into_iter()
            .rev()
            .map(|v| (v, self.color_for(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(values: &[i64]) -> ColorScale {
        ColorScale::calibrate(values.iter().copied(), &ScaleConfig::default())
    }

    #[test]
    fn domain_uses_ceiling_and_mean() {
        let s = scale(&[0, 100, 350]);
        assert_eq!(s.domain(), [0.0, 150.0, 400.0]);
        assert_eq!(scale(&[400]).domain_high, 400.0);
        assert_eq!(scale(&[401]).domain_high, 500.0);
    }

    #[test]
    fn anchors_return_exact_colors() {
        let s = scale(&[0, 100, 350]);
        assert_eq!(s.color_for(0.0), Rgb8::WHITE);
        assert_eq!(s.color_for(150.0), Rgb8::ORANGE);
        assert_eq!(s.color_for(400.0), Rgb8::RED);
        assert_eq!(s.color_for(-50.0), Rgb8::WHITE);
        assert_eq!(s.color_for(10_000.0), Rgb8::RED);
        assert_eq!(s.color_for(275.0), Rgb8::new(255, 83, 0));
    }

    #[test]
    fn empty_and_non_positive_data_degrade_to_constant() {
        for values in [&[][..], &[0, 0][..], &[-5, -200][..]] {
            let s = scale(values);
            assert_eq!(s.domain(), [0.0, 0.0, 0.0]);
            assert!(s.is_degenerate());
            assert_eq!(s.color_for(123.0), Rgb8::WHITE);
            assert_eq!(s.legend_stops(40), [(0.0, Rgb8::WHITE)]);
        }
    }

    #[test]
    fn domain_is_ordered_even_with_negative_mean() {
        let s = scale(&[-900, 10]);
        assert!(s.domain_low <= s.domain_mid && s.domain_mid <= s.domain_high);
        assert_eq!(s.domain(), [0.0, 0.0, 100.0]);
        assert_eq!(s.color_for(100.0), Rgb8::RED);
        assert_eq!(s.color_for(50.0), Rgb8::lerp(&Rgb8::ORANGE, &Rgb8::RED, 0.5));
    }

    #[test]
    fn sentinels_are_out_of_domain() {
        let s = scale(&[10, 20]);
        assert_eq!(s.color_for_cell(Cell::NoData), Rgb8::GRAY);
        assert_eq!(s.color_for_cell(Cell::Null), Rgb8::WHITE);
        assert_eq!(s.color_for_cell(Cell::Value(100)), Rgb8::RED);
    }

    #[test]
    fn legend_runs_high_to_low() {
        let s = scale(&[0, 100, 350]);
        let stops = s.legend_stops(4);
        let values: Vec<_> = stops.iter().map(|(v, _)| *v).collect();
        assert_eq!(values, [400.0, 300.0, 200.0, 100.0, 0.0]);
        assert_eq!(stops[0].1, Rgb8::RED);
        assert_eq!(stops[4].1, Rgb8::WHITE);
    }
}
