use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DomainError;
use crate::model::Checkpoint;

/// Shared logarithmic color range for a whole frame sequence.
///
/// Computed once over every snapshot so that a given color means the same
/// value in every frame of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    min_log: f64,
    max_log: f64,
}

impl ColorScale {
    /// Build a scale from explicit log-space bounds.
    ///
    /// Returns `None` unless both bounds are finite and `min_log <= max_log`.
    pub fn new(min_log: f64, max_log: f64) -> Option<Self> {
        (min_log.is_finite() && max_log.is_finite() && min_log <= max_log)
            .then_some(Self { min_log, max_log })
    }

    /// `[log10(min), log10(max)]` over every cell of every snapshot.
    ///
    /// Fails on the first cell (in snapshot, row, column order) whose
    /// logarithm is undefined.
    pub fn from_checkpoint(checkpoint: &Checkpoint) -> Result<Self, DomainError> {
        for snapshot in checkpoint.snapshots() {
            if let Some((row, column, value)) = snapshot.field.first_outside_log_domain() {
                return Err(DomainError::at_cell(Some(snapshot.index), row, column, value));
            }
        }
        let (min, max) = checkpoint.value_range().ok_or(DomainError::Empty)?;
        let scale = Self::new(min.log10(), max.log10()).ok_or(DomainError::Empty)?;
        debug!(
            min,
            max,
            min_log = scale.min_log,
            max_log = scale.max_log,
            "computed global color scale"
        );
        Ok(scale)
    }

    pub fn min_log(&self) -> f64 {
        self.min_log
    }

    pub fn max_log(&self) -> f64 {
        self.max_log
    }

    pub fn span(&self) -> f64 {
        self.max_log - self.min_log
    }

    pub fn contains(&self, log_value: f64) -> bool {
        log_value >= self.min_log && log_value <= self.max_log
    }

    /// Map a log-space value to `[0, 1]`, clamping outside the range.
    ///
    /// A degenerate range (every cell equal) maps everything to 0.
    pub fn normalize(&self, log_value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            return 0.0;
        }
        ((log_value - self.min_log) / span).clamp(0.0, 1.0)
    }

    /// Round tick values inside the range, using 1/2/5 × 10^k steps and
    /// at most about `max_count` intervals.
    pub fn ticks(&self, max_count: usize) -> Vec<f64> {
        let span = self.span();
        if span <= 0.0 {
            return vec![self.min_log];
        }
        let step = nice_step(span / max_count.max(1) as f64);
        let first = (self.min_log / step - 1e-9).ceil() as i64;
        let last = (self.max_log / step + 1e-9).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }
}

/// Smallest 1/2/5 × 10^k value that is `>= raw`.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= raw * (1.0 - 1e-12))
        .unwrap_or(10.0 * magnitude)
}
