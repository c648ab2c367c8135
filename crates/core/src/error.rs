use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parsers::checkpoint::CheckpointParseError;
use crate::raster::EncodeError;

/// Where in the snapshot stack a bad value sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLocation {
    /// Snapshot index, when known. A lone `Field` does not know its index.
    pub snapshot: Option<usize>,
    pub row: usize,
    pub column: usize,
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(snapshot) = self.snapshot {
            write!(f, "snapshot {snapshot}, ")?;
        }
        write!(f, "row {}, column {}", self.row, self.column)
    }
}

/// A value the logarithmic color scale cannot represent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("log10 is undefined for non-positive value {value} at {location}")]
    NonPositive { location: CellLocation, value: f64 },
    #[error("log10 is undefined for non-finite value {value} at {location}")]
    NonFinite { location: CellLocation, value: f64 },
    #[error("no values to scale")]
    Empty,
}

impl DomainError {
    pub(crate) fn at_cell(snapshot: Option<usize>, row: usize, column: usize, value: f64) -> Self {
        let location = CellLocation {
            snapshot,
            row,
            column,
        };
        if value.is_finite() {
            Self::NonPositive { location, value }
        } else {
            Self::NonFinite { location, value }
        }
    }

    /// Attach the snapshot index to an error raised by a single field.
    pub fn in_snapshot(self, index: usize) -> Self {
        match self {
            Self::NonPositive {
                mut location,
                value,
            } => {
                location.snapshot = Some(index);
                Self::NonPositive { location, value }
            }
            Self::NonFinite {
                mut location,
                value,
            } => {
                location.snapshot = Some(index);
                Self::NonFinite { location, value }
            }
            Self::Empty => Self::Empty,
        }
    }

    pub fn location(&self) -> Option<CellLocation> {
        match self {
            Self::NonPositive { location, .. } | Self::NonFinite { location, .. } => {
                Some(*location)
            }
            Self::Empty => None,
        }
    }
}

/// Top-level error for the load → scale → render pipeline.
///
/// Every variant is fatal; the pipeline never retries or skips a frame.
#[derive(Debug, Error)]
pub enum Error {
    #[error("checkpoint format: {0}")]
    Format(#[from] CheckpointParseError),
    #[error("color scale: {0}")]
    Domain(#[from] DomainError),
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode frame {index}: {source}")]
    Encode { index: usize, source: EncodeError },
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("invalid render options: {0}")]
    InvalidOptions(String),
}

impl Error {
    /// The pipeline stage that failed, for operator-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Format(_) => "parse",
            Self::Domain(_) => "log scale",
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::Encode { .. } => "render",
            Self::Manifest(_) => "manifest",
            Self::InvalidOptions(_) => "options",
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}
