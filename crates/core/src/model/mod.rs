pub mod checkpoint;
pub mod field;

pub use checkpoint::{Checkpoint, CheckpointHeader, Snapshot};
pub use field::Field;
