//! Single-line text input shared by the search bar, the upload path field and
//! the discussion composer.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::super::theme;

/// Text plus a byte-offset cursor that always sits on a char boundary.
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text; line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) {
        let flattened: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.content.insert_str(self.cursor, &flattened);
        self.cursor += flattened.len();
    }

    /// Replace everything, cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len())
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Whitespace-only counts as empty.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Render as one line. With `editing`, the char under the cursor is
    /// drawn inverted; an empty buffer shows `placeholder`.
    pub fn line(&self, editing: bool, placeholder: &str) -> Line<'static> {
        if self.content.is_empty() && !editing {
            return Line::styled(placeholder.to_string(), theme::muted());
        }
        if !editing {
            return Line::raw(self.content.clone());
        }

        let before = &self.content[..self.cursor];
        let cursor_char = self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after = self
            .content
            .get(self.cursor + cursor_char.len()..)
            .unwrap_or("");

        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled(
                cursor_char,
                Style::default().bg(theme::TEXT).fg(theme::BG_BASE),
            ),
            Span::raw(after.to_string()),
        ])
    }
}
