//! Help and coefficient overlays.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::formatters::format_value;
use super::layout::OverlayConfig;
use super::ThemeColors;
use crate::app::{App, INSTRUCTIONS};

fn overlay_block<'a>(title: &'a str, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.yellow))
        .style(Style::default().bg(colors.bg0))
}

/// Draw the instructions.
pub(super) fn draw_help(f: &mut Frame<'_>, config: &OverlayConfig, colors: &ThemeColors) {
    let area = centered_rect(config.percent_x, config.percent_y, f.area());

    // Clear the background
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(INSTRUCTIONS)
        .block(overlay_block(" Instructions ", colors))
        .style(Style::default().fg(colors.fg0))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Draw the coefficient table of the drawn phasors.
pub(super) fn draw_coefficients(f: &mut Frame<'_>, app: &App, config: &OverlayConfig, colors: &ThemeColors) {
    let area = centered_rect(config.percent_x, config.percent_y, f.area());
    f.render_widget(Clear, area);

    let coefficients = app.animation.coefficients();
    let title = format!(" Coefficients ({} phasors) ", coefficients.len());
    let block = overlay_block(&title, colors);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let header = Row::new(["k", "frequency", "amplitude", "phase"]).style(
        Style::default()
            .fg(colors.yellow)
            .add_modifier(Modifier::BOLD),
    );
    let visible = inner.height.saturating_sub(1) as usize;
    let rows: Vec<Row<'_>> = coefficients
        .iter()
        .skip(app.coefficient_scroll)
        .take(visible)
        .map(|c| {
            Row::new(vec![
                Cell::from(c.harmonic.to_string()),
                Cell::from(format!("{:.6}", c.frequency)),
                Cell::from(format_value(c.amplitude)),
                Cell::from(format!("{:+.4}", c.phase)),
            ])
            .style(Style::default().fg(colors.fg0))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(2);
    f.render_widget(table, inner);
}

/// Helper function to create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
