use crate::error::{DashboardError, DashboardResult};

/// Number of colour bands on the map
pub const BAND_COUNT: usize = 20;
/// Number of boundaries delimiting the bands
pub const BOUNDARY_COUNT: usize = BAND_COUNT + 1;

/// Quantile boundaries at 0%, 5%, ..., 100% of one value column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSequence {
    boundaries: [f64; BOUNDARY_COUNT],
}

impl ThresholdSequence {
    /// Compute the 21 quantiles with linear interpolation between order statistics.
    /// NaN entries are ignored; an empty column is `EmptyInput`.
    pub fn from_values(values: &[f64]) -> DashboardResult<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return Err(DashboardError::EmptyInput);
        }
        sorted.sort_by(f64::total_cmp);

        let last = (sorted.len() - 1) as f64;
        let mut boundaries = [0.0; BOUNDARY_COUNT];
        let mut floor = f64::MIN;

        for (i, boundary) in boundaries.iter_mut().enumerate() {
            let q = i as f64 / BAND_COUNT as f64;
            let pos = q * last;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let v = sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64);
            // interpolation rounding may dip below the previous boundary
            floor = floor.max(v);
            *boundary = floor;
        }

        Ok(Self { boundaries })
    }

    /// Compute from optional values, skipping the missing ones
    pub fn from_optional(values: impl IntoIterator<Item = Option<f64>>) -> DashboardResult<Self> {
        let present: Vec<f64> = values.into_iter().flatten().collect();
        Self::from_values(&present)
    }

    pub fn boundaries(&self) -> &[f64; BOUNDARY_COUNT] {
        &self.boundaries
    }

    pub fn min(&self) -> f64 {
        self.boundaries[0]
    }

    pub fn max(&self) -> f64 {
        self.boundaries[BAND_COUNT]
    }

    /// Band index in `0..BAND_COUNT` for a value: the number of inner
    /// boundaries strictly below it.
    pub fn band_of(&self, value: f64) -> usize {
        self.boundaries[1..BAND_COUNT]
            .iter()
            .filter(|&&b| b < value)
            .count()
    }
}
