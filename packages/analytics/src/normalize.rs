//! Normalization helpers shared by every tool.
//!
//! Display values live in min-max space: `0` is the observed minimum and
//! `1` the observed maximum. A constant series has a range of zero, so
//! its denominator is taken as `1` and every value maps to `0`.

/// Min-max scaling parameters fitted on a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    /// Observed minimum.
    pub min: f64,
    /// Observed maximum.
    pub max: f64,
}

impl MinMax {
    /// Fits on the given values. Returns `None` for an empty slice.
    #[must_use]
    pub fn fit(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    /// Denominator of the scaling, `1` for a constant series.
    #[must_use]
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 { 1.0 } else { range }
    }

    /// Scales one value. Values outside the fitted range fall outside
    /// `[0, 1]`.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }
}

/// Min-max scales a series with missing values. Missing stays missing.
#[must_use]
pub fn minmax(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = series.iter().flatten().copied().collect();
    let Some(scale) = MinMax::fit(&present) else {
        return vec![None; series.len()];
    };
    series.iter().map(|v| v.map(|x| scale.apply(x))).collect()
}

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n − 1). Zero for fewer than two values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values).unwrap_or_default();
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Population standard deviation (n).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_std(values: &[f64]) -> f64 {
    let Some(m) = mean(values) else {
        return 0.0;
    };
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// `(mean − sd, mean + sd)` in min-max space, each bound clamped to
/// `[0, 1]`. Uses the sample standard deviation of the present values.
///
/// Returns `None` when no value is present.
#[must_use]
pub fn zscore_band(series: &[Option<f64>]) -> Option<(f64, f64)> {
    let present: Vec<f64> = series.iter().flatten().copied().collect();
    let scale = MinMax::fit(&present)?;
    let m = mean(&present)?;
    let sd = sample_std(&present);

    let lower = scale.apply(m - sd).clamp(0.0, 1.0);
    let upper = scale.apply(m + sd).clamp(0.0, 1.0);
    Some((lower, upper))
}

/// Z-scores a column with the population standard deviation.
/// A zero-variance column is only centred.
#[must_use]
pub fn standardize(column: &[f64]) -> Vec<f64> {
    let m = mean(column).unwrap_or_default();
    let sd = population_std(column);
    let scale = if sd == 0.0 { 1.0 } else { sd };
    column.iter().map(|v| (v - m) / scale).collect()
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in `[0, 1]`. Returns `None` for an empty slice.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some((sorted[hi] - sorted[lo]).mul_add(frac, sorted[lo]))
}
