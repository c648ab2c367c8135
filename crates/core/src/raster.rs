//! PNG renderer: rasterizes the SVG document for a command list with resvg.
//!
//! PNG frames go through the same SVG path as vector frames, so titles,
//! tick labels and axis names appear in both formats.

use std::sync::{Arc, OnceLock};

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use snapreel_protocol::RenderCommand;
use thiserror::Error;
use tracing::debug;

use crate::backend::Theme;
use crate::svg;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot allocate a {width}x{height} pixel canvas")]
    Canvas { width: u32, height: u32 },
    #[error("frame document rejected by the rasterizer: {0}")]
    Svg(#[from] usvg::Error),
    #[error("png encoding failed: {0}")]
    Png(String),
}

/// Rasterize and PNG-encode a command list.
pub fn render_png(
    commands: &[RenderCommand],
    width: u32,
    height: u32,
    theme: Theme,
) -> Result<Vec<u8>, EncodeError> {
    let pixmap = rasterize(commands, width, height, theme)?;
    pixmap
        .encode_png()
        .map_err(|e| EncodeError::Png(e.to_string()))
}

pub fn rasterize(
    commands: &[RenderCommand],
    width: u32,
    height: u32,
    theme: Theme,
) -> Result<Pixmap, EncodeError> {
    let mut pixmap = Pixmap::new(width, height).ok_or(EncodeError::Canvas { width, height })?;
    let document = svg::render_svg(commands, f64::from(width), f64::from(height), theme);
    let options = usvg::Options {
        fontdb: system_fonts(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&document, &options)?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// System fonts, loaded once per process. When no face answers to the
/// generic `sans-serif` family, the first installed family stands in for it.
fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            let sans = fontdb::Query {
                families: &[fontdb::Family::SansSerif],
                ..fontdb::Query::default()
            };
            let stand_in = db
                .query(&sans)
                .is_none()
                .then(|| first_family(&db))
                .flatten();
            if let Some(family) = stand_in {
                debug!(%family, "no sans-serif face installed, using fallback family");
                db.set_sans_serif_family(family.clone());
                db.set_serif_family(family);
            }
            debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

fn first_family(db: &fontdb::Database) -> Option<String> {
    db.faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapreel_protocol::{Color, Point, Rect, TextAlign, ThemeToken};

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let px = pixmap.pixel(x, y).unwrap();
        [px.red(), px.green(), px.blue(), px.alpha()]
    }

    #[test]
    fn fills_exact_pixels() {
        let red = Color::rgb8(255, 0, 0);
        let commands = vec![RenderCommand::FillRect {
            rect: Rect::new(2.0, 1.0, 3.0, 2.0),
            color: red,
        }];
        let img = rasterize(&commands, 8, 4, Theme::Light).unwrap();
        assert_eq!(rgba(&img, 2, 1), [255, 0, 0, 255]);
        assert_eq!(rgba(&img, 4, 2), [255, 0, 0, 255]);
        assert_eq!(rgba(&img, 5, 2), [255, 255, 255, 255]);
        assert_eq!(rgba(&img, 2, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn background_follows_theme() {
        let img = rasterize(&[], 4, 4, Theme::Dark).unwrap();
        assert_eq!(
            rgba(&img, 1, 1),
            Theme::Dark.color(ThemeToken::Background).to_rgba8()
        );
    }

    #[test]
    fn title_text_leaves_pixels() {
        let title = RenderCommand::text(
            Point::new(320.0, 40.0),
            "log10(Temperature) at 0.0 seconds",
            ThemeToken::TextPrimary,
            24.0,
            TextAlign::Center,
        );
        let commands = vec![title];
        assert_ne!(
            render_png(&[], 640, 480, Theme::Light).unwrap(),
            render_png(&commands, 640, 480, Theme::Light).unwrap()
        );

        let titled = rasterize(&commands, 640, 480, Theme::Light).unwrap();
        let inked = (0..640)
            .flat_map(|x| (10..50).map(move |y| (x, y)))
            .filter(|&(x, y)| rgba(&titled, x, y) != [255, 255, 255, 255])
            .count();
        assert!(inked > 100, "only {inked} title pixels drawn");
    }

    #[test]
    fn adjacent_fractional_rects_tile_without_gaps() {
        let commands: Vec<_> = (0..3)
            .map(|i| RenderCommand::FillRect {
                rect: Rect::new(i as f64 * 10.0 / 3.0, 0.0, 10.0 / 3.0, 1.0),
                color: Color::rgb8(0, 0, i as u8 + 1),
            })
            .collect();
        let img = rasterize(&commands, 10, 1, Theme::Light).unwrap();
        for x in 0..10 {
            assert_ne!(rgba(&img, x, 0), [255, 255, 255, 255], "gap at {x}");
        }
    }

    #[test]
    fn out_of_bounds_geometry_is_clipped() {
        let commands = vec![
            RenderCommand::FillRect {
                rect: Rect::new(-5.0, -5.0, 100.0, 100.0),
                color: Color::rgb8(0, 0, 0),
            },
            RenderCommand::DrawLine {
                from: Point::new(-10.0, 2.0),
                to: Point::new(50.0, 2.0),
                color: ThemeToken::AxisLine,
                width: 1.0,
            },
        ];
        let img = rasterize(&commands, 4, 4, Theme::Dark).unwrap();
        assert_eq!(rgba(&img, 3, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn rejects_empty_canvas() {
        assert!(matches!(
            render_png(&[], 0, 10, Theme::Light),
            Err(EncodeError::Canvas { .. })
        ));
    }

    #[test]
    fn png_bytes_are_deterministic() {
        let commands = vec![RenderCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 4.0, 4.0),
            color: Color::rgb8(10, 20, 30),
        }];
        let a = render_png(&commands, 16, 16, Theme::Light).unwrap();
        let b = render_png(&commands, 16, 16, Theme::Light).unwrap();
        assert_eq!(&a[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(a, b);
    }
}
