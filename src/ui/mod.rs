//! User interface rendering.

mod canvas;
mod controls;
mod formatters;
mod keymap_bar;
pub mod layout;
mod overlay;
mod status_bar;
mod theme;

use crate::app::{App, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use layout::LayoutConfig;
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &App, layout: &LayoutConfig) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Main layout with status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    let panel = &layout.controls;
    if chunks[0].width >= panel.width + panel.min_canvas_width {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(panel.min_canvas_width), Constraint::Length(panel.width)])
            .split(chunks[0]);

        canvas::draw_canvas(f, content[0], &app.animation, &layout.canvas, &colors);
        controls::draw_controls(f, content[1], app, panel, &colors);
    } else {
        canvas::draw_canvas(f, chunks[0], &app.animation, &layout.canvas, &colors);
    }

    status_bar::draw_status(f, chunks[1], app, &colors);
    keymap_bar::draw_keymap(f, chunks[2], app.mode, &colors);

    // Overlays
    match app.mode {
        Mode::Help => overlay::draw_help(f, &layout.overlay, &colors),
        Mode::Coefficients => overlay::draw_coefficients(f, app, &layout.overlay, &colors),
        Mode::Normal | Mode::Editing | Mode::SliderEdit(_) => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| draw(f, app, &LayoutConfig::default()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_title_controls_and_keymap() {
        let app = App::new(&AnimationConfig::default()).unwrap();
        let screen = render(&app, 120, 40);
        assert!(screen.contains("f(t) = 3*rect(t)/2"));
        assert!(screen.contains("Controls"));
        assert!(screen.contains("< rectangle >"));
        assert!(screen.contains("Maximum Frequency 80"));
        assert!(screen.contains("q:quit"));
    }

    #[test]
    fn narrow_terminals_drop_the_panel() {
        let app = App::new(&AnimationConfig::default()).unwrap();
        let screen = render(&app, 60, 20);
        assert!(!screen.contains("Controls"));
    }

    #[test]
    fn slider_entry_line_replaces_value() {
        let mut app = App::new(&AnimationConfig::default()).unwrap();
        app.select_preset(2);
        while app.focused() != crate::app::Control::Parameter(0) {
            app.focus_next();
        }
        app.start_slider_edit(true);
        let screen = render(&app, 120, 40);
        assert!(screen.contains("sigma -10 10 2001"));
        assert!(screen.contains("Enter:apply"));
    }

    #[test]
    fn overlays_draw_on_top() {
        let mut app = App::new(&AnimationConfig::default()).unwrap();
        app.toggle_help();
        assert!(render(&app, 120, 40).contains("Instructions"));
        app.toggle_coefficients();
        let screen = render(&app, 120, 40);
        assert!(screen.contains("Coefficients (81 phasors)"));
        assert!(screen.contains("amplitude"));
    }
}
