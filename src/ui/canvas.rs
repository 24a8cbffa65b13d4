//! Phasor canvas.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Context, Line, Points},
        Block, Borders,
    },
    Frame,
};

use super::layout::CanvasConfig;
use super::ThemeColors;
use crate::animation::{FourierAnimation, TRACE_X};

const TICK_LABELS: [&str; 5] = ["s-π", "s-π/2", "s", "s+π/2", "s+π"];

fn draw_polyline(ctx: &mut Context<'_>, points: &[(f64, f64)], color: Color) {
    for pair in points.windows(2) {
        ctx.draw(&Line {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
            color,
        });
    }
}

fn draw_dashed(ctx: &mut Context<'_>, from: (f64, f64), to: (f64, f64), dash: f64, color: Color) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);
    if length < dash {
        return;
    }
    let steps = (length / dash).floor() as usize;
    for i in (0..steps).step_by(2) {
        let a = i as f64 / steps as f64;
        let b = (i + 1) as f64 / steps as f64;
        ctx.draw(&Line {
            x1: from.0 + a * dx,
            y1: from.1 + a * dy,
            x2: from.0 + b * dx,
            y2: from.1 + b * dy,
            color,
        });
    }
}

/// Draw the phasor chain and the scrolling traces.
pub(super) fn draw_canvas(
    f: &mut Frame<'_>,
    area: Rect,
    animation: &FourierAnimation,
    config: &CanvasConfig,
    colors: &ThemeColors,
) {
    let ([x_min, x_max], [y_min, y_max]) = animation.view_bounds();
    let outlines = animation.chain_outlines(config.circle_points);
    let arms: Vec<_> = animation.phasors().iter().map(|p| p.arm()).collect();
    let waveform = animation.waveform_trace();
    let partial = animation.partial_sum_trace();
    let [tip, joint] = animation.marker_line();
    let step = (TRACE_X.1 - TRACE_X.0) / (TICK_LABELS.len() - 1) as f64;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(format!(" {} ", animation.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .title_style(Style::default().fg(colors.yellow))
                .style(Style::default().bg(colors.bg0)),
        )
        .background_color(colors.bg0)
        .marker(Marker::Braille)
        .x_bounds([x_min, x_max])
        .y_bounds([y_min, y_max])
        .paint(move |ctx| {
            // Axis under the traces
            ctx.draw(&Line {
                x1: TRACE_X.0,
                y1: 0.0,
                x2: TRACE_X.1,
                y2: 0.0,
                color: colors.bg2,
            });
            for outline in &outlines {
                draw_polyline(ctx, outline, colors.aqua);
            }
            ctx.layer();

            for &((x1, y1), (x2, y2)) in &arms {
                ctx.draw(&Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: colors.green,
                });
            }
            draw_polyline(ctx, &waveform, colors.red);
            draw_polyline(ctx, &partial, colors.blue);
            draw_dashed(ctx, tip, joint, config.dash_length, colors.orange);
            ctx.draw(&Circle {
                x: tip.0,
                y: tip.1,
                radius: config.tip_radius,
                color: colors.orange,
            });
            ctx.draw(&Points {
                coords: &[joint],
                color: colors.orange,
            });
            ctx.layer();

            for (i, label) in TICK_LABELS.iter().enumerate() {
                ctx.print(
                    TRACE_X.0 + i as f64 * step,
                    y_min,
                    Span::styled(*label, Style::default().fg(colors.gray)),
                );
            }
        });

    f.render_widget(canvas, area);
}
