pub mod checkpoint;

pub use checkpoint::{CheckpointParseError, HeaderField, load, parse_checkpoint};
