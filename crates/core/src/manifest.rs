//! JSON index of a rendered frame sequence, for animation assemblers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::ImageFormat;
use crate::colormap::Colormap;
use crate::error::Error;
use crate::model::CheckpointHeader;
use crate::pipeline::{FrameRecord, RenderOptions, RenderReport};
use crate::scale::ColorScale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub header: CheckpointHeader,
    pub scale: ColorScale,
    pub format: ImageFormat,
    pub colormap: Colormap,
    pub quantity: String,
    /// Frames in snapshot order.
    pub frames: Vec<FrameRecord>,
}

impl Manifest {
    pub fn new(report: &RenderReport, options: &RenderOptions) -> Self {
        Self {
            header: report.header,
            scale: report.scale,
            format: options.format,
            colormap: options.colormap,
            quantity: options.quantity.clone(),
            frames: report.frames.clone(),
        }
    }
}

/// `<prefix>manifest.json`, next to the frames.
pub fn manifest_path(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}manifest.json"))
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), Error> {
    let json = serde_json::to_vec_pretty(manifest)?;
    std::fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_manifest(path: &Path) -> Result<Manifest, Error> {
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&data)?)
}
