//! Expression entry line.

use unicode_width::UnicodeWidthStr;

/// Editable single-line buffer with a cursor.
#[derive(Debug, Default)]
pub struct ExpressionInput {
    is_active: bool,
    buffer: String,
    /// Cursor position as a byte offset into `buffer`.
    cursor: usize,
}

impl ExpressionInput {
    /// Create an inactive input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the line is being edited.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Start editing, prefilled with `text`.
    pub fn start(&mut self, text: &str) {
        self.is_active = true;
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    /// Insert a character at the cursor.
    pub fn input(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.buffer.remove(self.cursor);
        }
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    /// Move the cursor one character left.
    pub fn left(&mut self) {
        if let Some(c) = self.buffer[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    /// Move the cursor one character right.
    pub fn right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Move the cursor to the start of the line.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end of the line.
    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Finish editing and hand back the text.
    pub fn submit(&mut self) -> String {
        self.is_active = false;
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Abandon the edit.
    pub fn cancel(&mut self) {
        self.is_active = false;
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Get the text being edited.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Display column of the cursor.
    pub fn cursor_column(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut input = ExpressionInput::new();
        input.start("sin(t)");
        input.left();
        input.left();
        input.input('2');
        input.input('*');
        assert_eq!(input.buffer(), "sin(2*t)");
        input.home();
        input.delete();
        input.right();
        input.backspace();
        assert_eq!(input.buffer(), "n(2*t)");
        assert_eq!(input.cursor_column(), 0);
    }

    #[test]
    fn handles_multibyte_characters() {
        let mut input = ExpressionInput::new();
        input.start("σ*t");
        input.home();
        input.right();
        assert_eq!(input.cursor_column(), 1);
        input.backspace();
        assert_eq!(input.buffer(), "*t");
    }

    #[test]
    fn submit_and_cancel_deactivate() {
        let mut input = ExpressionInput::new();
        input.start("t");
        input.input('^');
        input.input('2');
        assert!(input.is_active());
        assert_eq!(input.submit(), "t^2");
        assert!(!input.is_active());

        input.start("cos(t)");
        input.cancel();
        assert!(!input.is_active());
        assert_eq!(input.buffer(), "");
    }
}
