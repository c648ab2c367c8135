//! The load → scale → render loop.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapreel_protocol::Viewport;
use tracing::{debug, info};

use crate::backend::{ImageFormat, Theme};
use crate::colormap::Colormap;
use crate::error::Error;
use crate::manifest::{self, Manifest};
use crate::model::{Checkpoint, CheckpointHeader};
use crate::naming::frame_path;
use crate::parsers::load;
use crate::scale::ColorScale;
use crate::views::frame::{self, FrameSpec, render_frame};

/// How frames are drawn and written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    pub format: ImageFormat,
    pub colormap: Colormap,
    pub theme: Theme,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Name of the plotted quantity, shown in each title.
    pub quantity: String,
    /// Also write `<prefix>manifest.json` listing every frame.
    pub manifest: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            colormap: Colormap::default(),
            theme: Theme::default(),
            width: 640,
            height: 480,
            quantity: "Temperature".to_string(),
            manifest: false,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), Error> {
        if f64::from(self.width) < frame::MIN_WIDTH || f64::from(self.height) < frame::MIN_HEIGHT {
            return Err(Error::InvalidOptions(format!(
                "image size {}x{} is below the {}x{} minimum",
                self.width,
                self.height,
                frame::MIN_WIDTH,
                frame::MIN_HEIGHT
            )));
        }
        if self.quantity.trim().is_empty() {
            return Err(Error::InvalidOptions("quantity name is empty".to_string()));
        }
        Ok(())
    }
}

/// One written image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub index: usize,
    /// Simulation time in seconds.
    pub time: f64,
    pub path: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub header: CheckpointHeader,
    pub scale: ColorScale,
    pub frames: Vec<FrameRecord>,
    pub manifest: Option<PathBuf>,
}

/// Load a checkpoint file and render every snapshot.
///
/// Options are checked before the file is read, so a bad canvas size is
/// reported without touching the input.
pub fn run(
    input: impl AsRef<Path>,
    prefix: &str,
    options: &RenderOptions,
) -> Result<RenderReport, Error> {
    options.validate()?;
    let checkpoint = load(input)?;
    render(&checkpoint, prefix, options)
}

/// Render one image per snapshot, named `<prefix><index>.<ext>`.
///
/// The color scale is computed once over the whole checkpoint before any
/// frame is drawn. Each frame is built from a fresh command list, so no
/// drawing state carries over between frames. The first failure aborts the
/// run; frames already written stay on disk.
pub fn render(
    checkpoint: &Checkpoint,
    prefix: &str,
    options: &RenderOptions,
) -> Result<RenderReport, Error> {
    options.validate()?;
    let scale = ColorScale::from_checkpoint(checkpoint)?;
    let count = checkpoint.len();
    info!(
        frames = count,
        min_log = scale.min_log(),
        max_log = scale.max_log(),
        format = %options.format,
        "rendering frames"
    );

    let viewport = Viewport::new(f64::from(options.width), f64::from(options.height));
    let mut frames = Vec::with_capacity(count);
    for snapshot in checkpoint.snapshots() {
        let path = frame_path(prefix, snapshot.index, count, options.format);
        let logged = snapshot.log10()?;
        let commands = render_frame(&FrameSpec {
            field: &logged,
            time: snapshot.time,
            scale,
            colormap: options.colormap,
            quantity: &options.quantity,
            viewport,
        });
        debug!(index = snapshot.index, commands = commands.len(), "built frame");

        let bytes = options
            .format
            .encode(&commands, options.width, options.height, options.theme)
            .map_err(|source| Error::Encode {
                index: snapshot.index,
                source,
            })?;
        std::fs::write(&path, bytes).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        info!(
            index = snapshot.index,
            time = snapshot.time,
            path = %path.display(),
            "wrote frame"
        );
        frames.push(FrameRecord {
            index: snapshot.index,
            time: snapshot.time,
            path,
        });
    }

    let mut report = RenderReport {
        header: checkpoint.header,
        scale,
        frames,
        manifest: None,
    };
    if options.manifest {
        let path = manifest::manifest_path(prefix);
        manifest::write_manifest(&path, &Manifest::new(&report, options))?;
        info!(path = %path.display(), "wrote manifest");
        report.manifest = Some(path);
    }
    Ok(report)
}
