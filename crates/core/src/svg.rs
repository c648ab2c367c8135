//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use snapreel_protocol::{RenderCommand, TextAlign, ThemeToken};

use crate::backend::Theme;

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `theme` resolves the chrome color tokens.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, theme: Theme) -> String {
    let mut svg = String::with_capacity(commands.len() * 96 + 256);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" shape-rendering="crispEdges" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );

    let bg = resolve_color(ThemeToken::Background, theme);
    let _ = write!(svg, r#"<rect width="{width}" height="{height}" fill="{bg}"/>"#);

    for cmd in commands {
        match cmd {
            RenderCommand::FillRect { rect, color } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    num(rect.x),
                    num(rect.y),
                    num(rect.w),
                    num(rect.h),
                    color.to_hex(),
                );
            }
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                let fill = resolve_color(*color, theme);
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    num(rect.x),
                    num(rect.y),
                    num(rect.w),
                    num(rect.h),
                );
                if let Some(border) = border_color {
                    let stroke = resolve_color(*border, theme);
                    let _ = write!(svg, r#" stroke="{stroke}""#);
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, theme);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{}"/>"#,
                    num(from.x),
                    num(from.y),
                    num(to.x),
                    num(to.y),
                    num(*line_width),
                );
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                rotation,
            } => {
                let fill = resolve_color(*color, theme);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let (x, y) = (num(position.x), num(position.y));
                let _ = write!(
                    svg,
                    r#"<text x="{x}" y="{y}" fill="{fill}" font-size="{}" text-anchor="{anchor}""#,
                    num(*font_size),
                );
                if *rotation != 0.0 {
                    let _ = write!(svg, r#" transform="rotate({} {x} {y})""#, num(*rotation));
                }
                let _ = write!(svg, ">{}</text>", escape_xml(text));
            }
            RenderCommand::BeginGroup { id } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, theme: Theme) -> String {
    theme.color(token).to_hex()
}

/// Coordinates with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapreel_protocol::{Color, Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![RenderCommand::FillRect {
            rect: Rect::new(10.0, 20.0, 100.0, 18.0),
            color: Color::rgb8(0xbc, 0x37, 0x54),
        }];
        let svg = render_svg(&commands, 800.0, 400.0, Theme::Dark);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r##"<rect x="10" y="20" width="100" height="18" fill="#bc3754"/>"##));
        // Dark background.
        assert!(svg.contains("#1a1a2e"));
    }

    #[test]
    fn rotated_text_gets_a_transform() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(20.0, 200.0),
            text: "y index".into(),
            color: ThemeToken::TextPrimary,
            font_size: 12.0,
            align: TextAlign::Center,
            rotation: -90.0,
        }];
        let svg = render_svg(&commands, 400.0, 400.0, Theme::Light);
        assert!(svg.contains(r#"transform="rotate(-90 20 200)""#), "{svg}");
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(">y index</text>"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::text(
            Point::new(0.0, 0.0),
            "log10(T<K> & \"x\")",
            ThemeToken::TextPrimary,
            12.0,
            TextAlign::Left,
        )];
        let svg = render_svg(&commands, 400.0, 100.0, Theme::Light);
        assert!(svg.contains("log10(T&lt;K&gt; &amp; &quot;x&quot;)"));
    }

    #[test]
    fn groups_nest() {
        let commands = vec![
            RenderCommand::BeginGroup { id: "cells".into() },
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&commands, 10.0, 10.0, Theme::Light);
        assert!(svg.contains(r#"<g id="cells"></g>"#));
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.1 + 0.2), "0.3");
        assert_eq!(num(121.456789), "121.457");
        assert_eq!(num(-0.0001), "0");
    }
}
