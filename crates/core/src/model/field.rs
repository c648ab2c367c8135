use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One 2-D scalar field (a single snapshot), stored row-major.
///
/// Index `(row, col)` lives at `values[row * width + col]`; the column
/// varies fastest, matching the flattened checkpoint encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Field {
    /// Build a field from flattened row-major values.
    ///
    /// Returns `None` when either dimension is zero or `values` does not
    /// hold exactly `width * height` entries.
    pub fn from_flat(width: usize, height: usize, values: Vec<f64>) -> Option<Self> {
        if width == 0 || height == 0 || width.checked_mul(height) != Some(values.len()) {
            return None;
        }
        Some(Self {
            width,
            height,
            values,
        })
    }

    /// Build a field from nested rows. All rows must share one length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let width = rows.first()?.len();
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Self::from_flat(width, rows.len(), rows.concat())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.values.get(row * self.width + col).copied()
    }

    /// Iterate over rows, top (row 0) first.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.width)
    }

    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Position and value of the first cell without a finite logarithm
    /// (zero, negative, NaN or infinite), in scan order.
    pub fn first_outside_log_domain(&self) -> Option<(usize, usize, f64)> {
        self.values
            .iter()
            .position(|&v| !(v > 0.0 && v.is_finite()))
            .map(|i| (i / self.width, i % self.width, self.values[i]))
    }

    /// Element-wise base-10 logarithm.
    ///
    /// Fails on the first cell outside the log domain instead of letting
    /// `-inf` or NaN leak into the image.
    pub fn log10(&self) -> Result<Field, DomainError> {
        if let Some((row, column, value)) = self.first_outside_log_domain() {
            return Err(DomainError::at_cell(None, row, column, value));
        }
        Ok(Field {
            width: self.width,
            height: self.height,
            values: self.values.iter().map(|v| v.log10()).collect(),
        })
    }
}
