//! Status bar UI component.

use crate::app::{App, Mode};
use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the status bar.
pub fn draw_status(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let text = match app.mode {
        Mode::Editing => format!("f(t) = {}", app.input.buffer()),
        _ => app.status.clone(),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(colors.fg0).bg(colors.bg1));

    f.render_widget(paragraph, area);
}
