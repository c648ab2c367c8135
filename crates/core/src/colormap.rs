//! Perceptual colormaps for the data cells and the legend.
//!
//! Each map is a short list of evenly spaced sRGB stops; sampling
//! interpolates linearly between the two neighbouring stops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snapreel_protocol::Color;
use thiserror::Error;

const INFERNO: &[[u8; 3]] = &[
    [0x00, 0x00, 0x04],
    [0x16, 0x0b, 0x39],
    [0x42, 0x0a, 0x68],
    [0x6a, 0x17, 0x6e],
    [0x93, 0x26, 0x67],
    [0xbc, 0x37, 0x54],
    [0xdd, 0x51, 0x3a],
    [0xf3, 0x78, 0x19],
    [0xfc, 0xa5, 0x0a],
    [0xf6, 0xd7, 0x46],
    [0xfc, 0xff, 0xa4],
];

const VIRIDIS: &[[u8; 3]] = &[
    [0x44, 0x01, 0x54],
    [0x48, 0x24, 0x75],
    [0x41, 0x44, 0x87],
    [0x35, 0x5f, 0x8d],
    [0x2a, 0x78, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x22, 0xa8, 0x84],
    [0x44, 0xbf, 0x70],
    [0x7a, 0xd1, 0x51],
    [0xbd, 0xdf, 0x26],
    [0xfd, 0xe7, 0x25],
];

const MAGMA: &[[u8; 3]] = &[
    [0x00, 0x00, 0x04],
    [0x14, 0x0e, 0x36],
    [0x3b, 0x0f, 0x70],
    [0x64, 0x1a, 0x80],
    [0x8c, 0x29, 0x81],
    [0xb7, 0x37, 0x79],
    [0xde, 0x49, 0x68],
    [0xf7, 0x70, 0x5c],
    [0xfe, 0x9f, 0x6d],
    [0xfe, 0xcf, 0x92],
    [0xfc, 0xfd, 0xbf],
];

const GRAY: &[[u8; 3]] = &[[0x00, 0x00, 0x00], [0xff, 0xff, 0xff]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Inferno,
    Viridis,
    Magma,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown colormap {0:?} (expected inferno, viridis, magma or gray)")]
pub struct UnknownColormap(pub String);

impl Colormap {
    pub const ALL: [Colormap; 4] = [Self::Inferno, Self::Viridis, Self::Magma, Self::Gray];

    pub fn name(self) -> &'static str {
        match self {
            Self::Inferno => "inferno",
            Self::Viridis => "viridis",
            Self::Magma => "magma",
            Self::Gray => "gray",
        }
    }

    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            Self::Inferno => INFERNO,
            Self::Viridis => VIRIDIS,
            Self::Magma => MAGMA,
            Self::Gray => GRAY,
        }
    }

    /// Color at position `t` in `[0, 1]`. Out-of-range and NaN inputs
    /// clamp to the nearest end.
    pub fn sample(self, t: f64) -> Color {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let lo = (pos.floor() as usize).min(stops.len() - 2);
        let frac = (pos - lo as f64) as f32;
        let (a, b) = (stops[lo], stops[lo + 1]);
        let lerp = |i: usize| {
            let (x, y) = (f32::from(a[i]), f32::from(b[i]));
            (x + (y - x) * frac) / 255.0
        };
        Color::rgba(lerp(0), lerp(1), lerp(2), 1.0)
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = UnknownColormap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted || (wanted == "grey" && *c == Self::Gray))
            .ok_or_else(|| UnknownColormap(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_first_and_last_stops() {
        assert_eq!(Colormap::Inferno.sample(0.0).to_hex(), "#000004");
        assert_eq!(Colormap::Inferno.sample(1.0).to_hex(), "#fcffa4");
        assert_eq!(Colormap::Viridis.sample(1.0).to_hex(), "#fde725");
    }

    #[test]
    fn clamps_out_of_range_input() {
        assert_eq!(Colormap::Gray.sample(-3.0), Colormap::Gray.sample(0.0));
        assert_eq!(Colormap::Gray.sample(7.0), Colormap::Gray.sample(1.0));
        assert_eq!(Colormap::Gray.sample(f64::NAN), Colormap::Gray.sample(0.0));
    }

    #[test]
    fn interpolates_between_stops() {
        let mid = Colormap::Gray.sample(0.5).to_rgba8();
        assert_eq!(mid, [128, 128, 128, 255]);
    }

    #[test]
    fn luminance_increases_along_inferno() {
        let luma = |t: f64| {
            let c = Colormap::Inferno.sample(t);
            0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b
        };
        let samples: Vec<f32> = (0..=20).map(|i| luma(i as f64 / 20.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]), "{samples:?}");
    }

    #[test]
    fn parses_names() {
        assert_eq!("Viridis".parse::<Colormap>(), Ok(Colormap::Viridis));
        assert_eq!("grey".parse::<Colormap>(), Ok(Colormap::Gray));
        assert!("jet".parse::<Colormap>().is_err());
        for c in Colormap::ALL {
            assert_eq!(c.to_string().parse::<Colormap>(), Ok(c));
        }
    }
}
