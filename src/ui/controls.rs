//! Control panel: preset, expression and sliders.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::formatters::{format_value, slider_bar};
use super::layout::ControlPanelConfig;
use super::ThemeColors;
use crate::app::{App, Control, Mode};
use crate::slider::Slider;

fn label_style(focused: bool, colors: &ThemeColors) -> Style {
    if focused {
        Style::default()
            .fg(colors.bg0)
            .bg(colors.yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.yellow)
    }
}

fn entry_style(colors: &ThemeColors) -> Style {
    Style::default().fg(colors.fg0).bg(colors.bg1)
}

/// Label line and track of one slider. `entry` replaces the value while
/// the slider's entry line is open.
fn slider_lines(
    slider: &Slider,
    focused: bool,
    entry: Option<&str>,
    config: &ControlPanelConfig,
    colors: &ThemeColors,
) -> Vec<Line<'static>> {
    let value = match entry {
        Some(text) => Span::styled(text.to_string(), entry_style(colors)),
        None => Span::styled(format_value(slider.value()), Style::default().fg(colors.fg0)),
    };
    vec![
        Line::from(vec![
            Span::styled(slider.label().to_string(), label_style(focused, colors)),
            Span::raw(" "),
            value,
        ]),
        Line::from(Span::styled(
            slider_bar(slider.ratio(), config.slider_width),
            Style::default().fg(if focused { colors.yellow } else { colors.gray }),
        )),
    ]
}

/// Draw the control panel.
pub(super) fn draw_controls(
    f: &mut Frame<'_>,
    area: Rect,
    app: &App,
    config: &ControlPanelConfig,
    colors: &ThemeColors,
) {
    let animation = &app.animation;
    let focused = app.focused();
    let mut lines = Vec::new();

    let preset = animation.preset().map(|p| p.name).unwrap_or("custom");
    lines.push(Line::from(vec![
        Span::styled("Preset", label_style(focused == Control::Preset, colors)),
        Span::raw(" "),
        Span::styled(format!("< {} >", preset), Style::default().fg(colors.fg0)),
    ]));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        "Waveform f(t)",
        Style::default().fg(colors.yellow),
    )));
    // Row and column offset of the entry line, if one is open
    let mut cursor_anchor = None;
    if app.mode == Mode::Editing {
        cursor_anchor = Some((lines.len(), 0));
        lines.push(Line::from(Span::styled(
            app.input.buffer().to_string(),
            entry_style(colors),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            animation.waveform().source().to_string(),
            Style::default().fg(colors.aqua),
        )));
    }
    lines.push(Line::default());

    lines.extend(slider_lines(
        animation.max_frequency_slider(),
        focused == Control::MaxFrequency,
        None,
        config,
        colors,
    ));
    lines.extend(slider_lines(
        animation.speed_slider(),
        focused == Control::Speed,
        None,
        config,
        colors,
    ));

    if !animation.params().is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Parameters",
            Style::default().fg(colors.gray),
        )));
        for (i, slider) in animation.params().sliders().iter().enumerate() {
            let entry = if app.mode == Mode::SliderEdit(i) {
                cursor_anchor = Some((lines.len(), slider.label().width() + 1));
                Some(app.input.buffer())
            } else {
                None
            };
            lines.extend(slider_lines(
                slider,
                focused == Control::Parameter(i),
                entry,
                config,
                colors,
            ));
        }
    }

    lines.push(Line::default());
    let mut info = format!(
        "{} spectrum, {} circles",
        animation.data().mode(),
        animation.circles()
    );
    if animation.is_paused() {
        info.push_str(", paused");
    }
    lines.push(Line::from(Span::styled(info, Style::default().fg(colors.gray))));
    if animation.data().rescaled() {
        lines.push(Line::from(Span::styled(
            "rescaled to fit the plot",
            Style::default().fg(colors.gray),
        )));
    }

    let block = Block::default()
        .title(" Controls ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.bg2))
        .style(Style::default().bg(colors.bg0));
    let inner = block.inner(area);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(colors.fg0))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);

    if let Some((row, offset)) = cursor_anchor {
        let column = (offset as u16).saturating_add(app.input.cursor_column());
        let x = inner.x + column.min(inner.width.saturating_sub(1));
        let y = inner.y + row as u16;
        if y < inner.bottom() {
            f.set_cursor_position(Position::new(x, y));
        }
    }
}
