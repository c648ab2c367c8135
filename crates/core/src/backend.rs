//! Image backends: turn a frame's render commands into file bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snapreel_protocol::{Color, RenderCommand, ThemeToken};
use thiserror::Error;

use crate::raster::{self, EncodeError};
use crate::svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Vector output with title, axis labels and legend text.
    #[default]
    Svg,
    /// Raster output, rasterized from the same SVG document.
    Png,
}

/// Palette used for figure chrome (background, axes, text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// Encode one frame. Identical commands always give identical bytes.
    pub fn encode(
        self,
        commands: &[RenderCommand],
        width: u32,
        height: u32,
        theme: Theme,
    ) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Svg => Ok(
                svg::render_svg(commands, f64::from(width), f64::from(height), theme).into_bytes(),
            ),
            Self::Png => raster::render_png(commands, width, height, theme),
        }
    }
}

impl Theme {
    pub fn color(self, token: ThemeToken) -> Color {
        let [r, g, b] = match self {
            Self::Light => match token {
                ThemeToken::Background => [0xff, 0xff, 0xff],
                ThemeToken::AxisLine | ThemeToken::TickLine => [0x22, 0x22, 0x22],
                ThemeToken::TextPrimary => [0x1a, 0x1a, 0x2e],
                ThemeToken::TextSecondary => [0x66, 0x66, 0x77],
            },
            Self::Dark => match token {
                ThemeToken::Background => [0x1a, 0x1a, 0x2e],
                ThemeToken::AxisLine | ThemeToken::TickLine => [0xbd, 0xbd, 0xbd],
                ThemeToken::TextPrimary => [0xec, 0xec, 0xec],
                ThemeToken::TextSecondary => [0x9e, 0x9e, 0x9e],
            },
        };
        Color::rgb8(r, g, b)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(UnknownVariant {
                kind: "image format",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownVariant {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}
