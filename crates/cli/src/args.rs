use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use snapreel_core::{Colormap, ImageFormat, RenderOptions, Theme};

#[derive(Parser, Debug)]
#[command(
    name = "snapreel",
    author,
    version,
    about = "Render checkpoint snapshots as color-mapped frames on a shared log10 scale"
)]
pub struct Cli {
    /// Checkpoint file to read
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output filename prefix; frames are written as <PREFIX>000.<ext>, <PREFIX>001.<ext>, ...
    pub prefix: String,

    /// Image format
    #[arg(long, value_enum)]
    pub format: Option<FormatOpt>,

    /// Colormap for the field values
    #[arg(long, value_enum)]
    pub colormap: Option<ColormapOpt>,

    /// Palette for background, axes and text
    #[arg(long, value_enum)]
    pub theme: Option<ThemeOpt>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Name of the plotted quantity, used in frame titles
    #[arg(long)]
    pub quantity: Option<String>,

    /// Also write <PREFIX>manifest.json listing every frame
    #[arg(long, action = ArgAction::SetTrue)]
    pub manifest: bool,

    /// JSON file with render options; flags given here take precedence
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Log per-frame details
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatOpt {
    Svg,
    Png,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColormapOpt {
    Inferno,
    Viridis,
    Magma,
    Gray,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeOpt {
    Light,
    Dark,
}

impl From<FormatOpt> for ImageFormat {
    fn from(opt: FormatOpt) -> Self {
        match opt {
            FormatOpt::Svg => ImageFormat::Svg,
            FormatOpt::Png => ImageFormat::Png,
        }
    }
}

impl From<ColormapOpt> for Colormap {
    fn from(opt: ColormapOpt) -> Self {
        match opt {
            ColormapOpt::Inferno => Colormap::Inferno,
            ColormapOpt::Viridis => Colormap::Viridis,
            ColormapOpt::Magma => Colormap::Magma,
            ColormapOpt::Gray => Colormap::Gray,
        }
    }
}

impl From<ThemeOpt> for Theme {
    fn from(opt: ThemeOpt) -> Self {
        match opt {
            ThemeOpt::Light => Theme::Light,
            ThemeOpt::Dark => Theme::Dark,
        }
    }
}

impl Cli {
    /// Level forced by `-v` or `-q`. `None` leaves it to `RUST_LOG`.
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("warn")
        } else {
            None
        }
    }

    /// Defaults, then `--config`, then explicit flags.
    pub fn render_options(&self) -> Result<RenderOptions> {
        let base = match &self.config {
            Some(path) => crate::read_config(path)?,
            None => RenderOptions::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if let Some(format) = self.format {
            options.format = format.into();
        }
        if let Some(colormap) = self.colormap {
            options.colormap = colormap.into();
        }
        if let Some(theme) = self.theme {
            options.theme = theme.into();
        }
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(quantity) = &self.quantity {
            options.quantity = quantity.clone();
        }
        options.manifest |= self.manifest;
        options
    }
}
