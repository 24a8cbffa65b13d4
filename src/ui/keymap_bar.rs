//! Keymap help bar UI component.

use crate::app::Mode;
use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Key hints for `mode`.
pub fn keymap_text(mode: Mode) -> &'static str {
    match mode {
        Mode::Editing => "Enter:apply | Esc:cancel | ←→:move | Type an expression in t",
        Mode::SliderEdit(_) => "Enter:apply | Esc:cancel | ←→:move | min max ticks, or =value",
        Mode::Help => "q/Esc/?:close",
        Mode::Coefficients => "jk/↑↓:scroll | PgUp/PgDn:page | c:copy | q/Esc/f:close",
        Mode::Normal => {
            "q:quit | e:edit | Tab:focus | hl/←→:adjust | r/=:range/value | []:preset | space:pause | d:deriv | m:spectrum | f:coeffs | c:copy | T:theme | ?:help"
        },
    }
}

/// Draw the keymap help bar.
pub fn draw_keymap(f: &mut Frame<'_>, area: Rect, mode: Mode, colors: &ThemeColors) {
    let paragraph =
        Paragraph::new(keymap_text(mode)).style(Style::default().fg(colors.fg0).bg(colors.bg0));

    f.render_widget(paragraph, area);
}
