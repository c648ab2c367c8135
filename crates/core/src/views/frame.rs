//! Frame view transform: one log-scaled snapshot → a complete,
//! self-contained list of render commands for one image.

use snapreel_protocol::{Color, Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::colormap::Colormap;
use crate::model::Field;
use crate::scale::ColorScale;

pub const MIN_WIDTH: f64 = 200.0;
pub const MIN_HEIGHT: f64 = 150.0;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 52.0;
const LEGEND_GAP: f64 = 16.0;
const LEGEND_WIDTH: f64 = 18.0;
const LEGEND_LABEL_SPACE: f64 = 56.0;
const LEGEND_STEPS: usize = 64;
const LEGEND_MAX_TICKS: usize = 6;
const AXIS_MAX_TICKS: usize = 8;
const TICK_LENGTH: f64 = 5.0;
const TITLE_FONT_SIZE: f64 = 13.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const TICK_FONT_SIZE: f64 = 10.0;

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSpec<'a> {
    /// Log10 of the snapshot's field.
    pub field: &'a Field,
    /// Simulation time of the snapshot, in seconds.
    pub time: f64,
    /// Global scale shared by every frame of the run.
    pub scale: ColorScale,
    pub colormap: Colormap,
    /// Name of the plotted quantity, used in the title.
    pub quantity: &'a str,
    pub viewport: Viewport,
}

/// Title shown above each frame.
pub fn frame_title(quantity: &str, time: f64) -> String {
    format!("log10({quantity}) at {} seconds", format_time(time))
}

/// Build the render commands for one frame.
///
/// Row 0 of the field is drawn at the top, like an image. Cells stretch to
/// fill the plot area and are drawn without smoothing.
pub fn render_frame(spec: &FrameSpec<'_>) -> Vec<RenderCommand> {
    let vp = spec.viewport;
    let plot = plot_area(&vp);
    let field = spec.field;
    let mut commands = Vec::with_capacity(field.values().len() + 64);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, vp.width, vp.height),
        color: ThemeToken::Background,
        border_color: None,
    });
    commands.push(RenderCommand::text(
        Point::new(plot.x + plot.w / 2.0, MARGIN_TOP - 14.0),
        frame_title(spec.quantity, spec.time),
        ThemeToken::TextPrimary,
        TITLE_FONT_SIZE,
        TextAlign::Center,
    ));

    commands.push(RenderCommand::BeginGroup { id: "cells".into() });
    push_cells(&mut commands, spec, &plot);
    push_outline(&mut commands, &plot);
    commands.push(RenderCommand::EndGroup);

    commands.push(RenderCommand::BeginGroup { id: "axes".into() });
    push_axes(&mut commands, field, &plot);
    commands.push(RenderCommand::EndGroup);

    commands.push(RenderCommand::BeginGroup {
        id: "legend".into(),
    });
    push_legend(&mut commands, spec, &plot);
    commands.push(RenderCommand::EndGroup);

    commands
}

fn plot_area(vp: &Viewport) -> Rect {
    let right = LEGEND_GAP + LEGEND_WIDTH + LEGEND_LABEL_SPACE;
    Rect::new(
        MARGIN_LEFT,
        MARGIN_TOP,
        (vp.width - MARGIN_LEFT - right).max(1.0),
        (vp.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    )
}

/// One rect per horizontal run of identically colored cells.
fn push_cells(commands: &mut Vec<RenderCommand>, spec: &FrameSpec<'_>, plot: &Rect) {
    let field = spec.field;
    let cw = plot.w / field.width() as f64;
    let ch = plot.h / field.height() as f64;
    let color_of = |v: f64| spec.colormap.sample(spec.scale.normalize(v));

    for (r, row) in field.rows().enumerate() {
        let y = plot.y + r as f64 * ch;
        let mut run_start = 0;
        let mut run_color: Option<Color> = None;
        for (c, &v) in row.iter().enumerate() {
            let color = color_of(v);
            match run_color {
                Some(prev) if prev.to_rgba8() == color.to_rgba8() => {}
                Some(prev) => {
                    commands.push(cell_run(plot.x, y, cw, ch, run_start, c, prev));
                    run_start = c;
                    run_color = Some(color);
                }
                None => run_color = Some(color),
            }
        }
        if let Some(prev) = run_color {
            commands.push(cell_run(plot.x, y, cw, ch, run_start, row.len(), prev));
        }
    }
}

fn cell_run(x0: f64, y: f64, cw: f64, ch: f64, start: usize, end: usize, color: Color) -> RenderCommand {
    RenderCommand::FillRect {
        rect: Rect::new(x0 + start as f64 * cw, y, (end - start) as f64 * cw, ch),
        color,
    }
}

fn push_outline(commands: &mut Vec<RenderCommand>, r: &Rect) {
    let corners = [
        Point::new(r.x, r.y),
        Point::new(r.right(), r.y),
        Point::new(r.right(), r.bottom()),
        Point::new(r.x, r.bottom()),
    ];
    for (&from, &to) in corners.iter().zip(corners.iter().cycle().skip(1)) {
        commands.push(RenderCommand::DrawLine {
            from,
            to,
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
    }
}

fn push_axes(commands: &mut Vec<RenderCommand>, field: &Field, plot: &Rect) {
    let cw = plot.w / field.width() as f64;
    let ch = plot.h / field.height() as f64;

    for i in index_ticks(field.width(), AXIS_MAX_TICKS) {
        let x = plot.x + (i as f64 + 0.5) * cw;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, plot.bottom()),
            to: Point::new(x, plot.bottom() + TICK_LENGTH),
            color: ThemeToken::TickLine,
            width: 1.0,
        });
        commands.push(RenderCommand::text(
            Point::new(x, plot.bottom() + TICK_LENGTH + TICK_FONT_SIZE + 2.0),
            i.to_string(),
            ThemeToken::TextSecondary,
            TICK_FONT_SIZE,
            TextAlign::Center,
        ));
    }

    for i in index_ticks(field.height(), AXIS_MAX_TICKS) {
        let y = plot.y + (i as f64 + 0.5) * ch;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(plot.x - TICK_LENGTH, y),
            to: Point::new(plot.x, y),
            color: ThemeToken::TickLine,
            width: 1.0,
        });
        commands.push(RenderCommand::text(
            Point::new(plot.x - TICK_LENGTH - 3.0, y + TICK_FONT_SIZE * 0.35),
            i.to_string(),
            ThemeToken::TextSecondary,
            TICK_FONT_SIZE,
            TextAlign::Right,
        ));
    }

    commands.push(RenderCommand::text(
        Point::new(plot.x + plot.w / 2.0, plot.bottom() + 40.0),
        "x index",
        ThemeToken::TextPrimary,
        LABEL_FONT_SIZE,
        TextAlign::Center,
    ));
    commands.push(RenderCommand::DrawText {
        position: Point::new(plot.x - 44.0, plot.y + plot.h / 2.0),
        text: "y index".into(),
        color: ThemeToken::TextPrimary,
        font_size: LABEL_FONT_SIZE,
        align: TextAlign::Center,
        rotation: -90.0,
    });
}

fn push_legend(commands: &mut Vec<RenderCommand>, spec: &FrameSpec<'_>, plot: &Rect) {
    let bar = Rect::new(plot.right() + LEGEND_GAP, plot.y, LEGEND_WIDTH, plot.h);
    let strip_h = bar.h / LEGEND_STEPS as f64;

    // Top strip is the maximum.
    for i in 0..LEGEND_STEPS {
        let t = 1.0 - (i as f64 + 0.5) / LEGEND_STEPS as f64;
        commands.push(RenderCommand::FillRect {
            rect: Rect::new(bar.x, bar.y + i as f64 * strip_h, bar.w, strip_h),
            color: spec.colormap.sample(t),
        });
    }
    push_outline(commands, &bar);

    let ticks = spec.scale.ticks(LEGEND_MAX_TICKS);
    let step = match ticks.as_slice() {
        [a, b, ..] => b - a,
        _ => 1.0,
    };
    for tick in ticks {
        let y = bar.bottom() - spec.scale.normalize(tick) * bar.h;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(bar.right(), y),
            to: Point::new(bar.right() + TICK_LENGTH, y),
            color: ThemeToken::TickLine,
            width: 1.0,
        });
        commands.push(RenderCommand::text(
            Point::new(bar.right() + TICK_LENGTH + 3.0, y + TICK_FONT_SIZE * 0.35),
            format_tick(tick, step),
            ThemeToken::TextSecondary,
            TICK_FONT_SIZE,
            TextAlign::Left,
        ));
    }
}

/// Integer cell indices to label on an axis of `len` cells.
fn index_ticks(len: usize, max_ticks: usize) -> Vec<usize> {
    let wanted = len.div_ceil(max_ticks.max(1)).max(1);
    let mut magnitude = 1;
    let step = loop {
        if let Some(step) = [1, 2, 5]
            .into_iter()
            .map(|m| m * magnitude)
            .find(|&s| s >= wanted)
        {
            break step;
        }
        magnitude *= 10;
    };
    (0..len).step_by(step).collect()
}

/// Label with just enough decimals to tell neighbouring ticks apart.
fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        2
    };
    let value = if value.abs() < step.abs() * 1e-6 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

/// Whole seconds keep one decimal, so `1.0` does not read as an index.
fn format_time(time: f64) -> String {
    if time.fract() == 0.0 && time.abs() < 1e15 {
        format!("{time:.1}")
    } else {
        format!("{time}")
    }
}
