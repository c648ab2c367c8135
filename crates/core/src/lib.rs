//! Render the snapshots of a flat checkpoint file as a sequence of
//! color-mapped images on one shared logarithmic scale.
//!
//! ```text
//!   checkpoint file ─▶ Checkpoint ─▶ ColorScale ─▶ frame view ─▶ RenderCommand[] ─▶ SVG / PNG
//!     (parsers)         (model)       (scale)       (views)        (protocol)         (backend)
//! ```

pub mod backend;
pub mod colormap;
pub mod error;
pub mod manifest;
pub mod model;
pub mod naming;
pub mod parsers;
pub mod pipeline;
pub mod raster;
pub mod scale;
pub mod svg;
pub mod views;

pub use backend::{ImageFormat, Theme};
pub use colormap::Colormap;
pub use error::{DomainError, Error};
pub use model::{Checkpoint, CheckpointHeader, Field};
pub use parsers::{CheckpointParseError, load, parse_checkpoint};
pub use pipeline::{FrameRecord, RenderOptions, RenderReport, render, run};
pub use scale::ColorScale;
