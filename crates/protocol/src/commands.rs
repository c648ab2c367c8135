use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a fresh `Vec<RenderCommand>` for every frame. Backends
/// consume this list sequentially — each command carries all the data it
/// needs, so no drawing state survives from one frame to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill a rectangle with an exact color. Used for data cells and the
    /// color legend, where the color comes from a colormap rather than
    /// the theme.
    FillRect { rect: Rect, color: Color },

    /// Draw a themed rectangle, optionally outlined.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Draw a text string anchored at a position.
    ///
    /// `rotation` is in degrees, clockwise, around the anchor point.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
        rotation: f64,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group (plot area, axis, legend). Backends may use
    /// this for layering or accessibility.
    BeginGroup { id: String },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl RenderCommand {
    /// Convenience constructor for unrotated text.
    pub fn text(
        position: Point,
        text: impl Into<String>,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    ) -> Self {
        Self::DrawText {
            position,
            text: text.into(),
            color,
            font_size,
            align,
            rotation: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_as_tagged_json() {
        let cmd = RenderCommand::FillRect {
            rect: Rect::new(1.0, 2.0, 3.0, 4.0),
            color: Color::rgb8(255, 0, 0),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.starts_with(r#"{"FillRect":"#), "json={json}");
        let back: RenderCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn text_helper_is_unrotated() {
        let cmd = RenderCommand::text(
            Point::new(0.0, 0.0),
            "x index",
            ThemeToken::TextPrimary,
            12.0,
            TextAlign::Center,
        );
        match cmd {
            RenderCommand::DrawText { rotation, text, .. } => {
                assert_eq!(rotation, 0.0);
                assert_eq!(text, "x index");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
