use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::model::Field;

/// Dimensions declared by the first three lines of a checkpoint file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHeader {
    /// Columns per snapshot.
    pub width: usize,
    /// Rows per snapshot.
    pub height: usize,
    /// Number of snapshots stored in the body.
    pub snapshot_count: usize,
}

impl CheckpointHeader {
    /// Comma-separated fields per body row, or `None` when the declared
    /// dimensions overflow `usize`.
    pub fn checked_row_len(&self) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_add(2)
    }

    /// Cells per snapshot. Saturates for headers the reader would reject.
    pub fn cells(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Comma-separated fields per body row: timestamp, cells, and the
    /// empty field left by the row's terminating delimiter.
    pub fn row_len(&self) -> usize {
        self.cells().saturating_add(2)
    }
}

/// A fully parsed checkpoint: one timestamp and one field per snapshot.
///
/// Built once by the reader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub header: CheckpointHeader,
    /// Simulation time in seconds, in file order.
    pub timestamps: Vec<f64>,
    /// `fields[snapshot]` is a `height × width` field.
    pub fields: Vec<Field>,
}

/// Borrowed view of one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub index: usize,
    pub time: f64,
    pub field: &'a Field,
}

impl Snapshot<'_> {
    /// Element-wise log10 of this snapshot's field.
    pub fn log10(&self) -> Result<Field, DomainError> {
        self.field.log10().map_err(|e| e.in_snapshot(self.index))
    }
}

impl Checkpoint {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn snapshot(&self, index: usize) -> Option<Snapshot<'_>> {
        Some(Snapshot {
            index,
            time: *self.timestamps.get(index)?,
            field: self.fields.get(index)?,
        })
    }

    pub fn snapshots(&self) -> impl Iterator<Item = Snapshot<'_>> {
        self.timestamps
            .iter()
            .zip(&self.fields)
            .enumerate()
            .map(|(index, (&time, field))| Snapshot { index, time, field })
    }

    /// Global `(min, max)` over every cell of every snapshot.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if self.fields.is_empty() {
            return None;
        }
        let min = self.fields.iter().map(Field::min).fold(f64::INFINITY, f64::min);
        let max = self
            .fields
            .iter()
            .map(Field::max)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}
