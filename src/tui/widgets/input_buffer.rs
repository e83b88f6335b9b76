//! Single-line text input with a byte-offset cursor.
//!
//! Backs the name and initiative fields of the entry form.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
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

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Replace the content and park the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.content = text.to_string();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.content[..self.cursor].chars().count()
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        text.chars().for_each(|c| buf.insert_char(c));
        buf
    }

    #[test]
    fn test_insert_and_cursor() {
        let buf = typed("hi");
        assert_eq!(buf.text(), "hi");
        assert_eq!(buf.cursor_column(), 2);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut buf = typed("abc");
        buf.backspace();
        assert_eq!(buf.text(), "ab");

        buf.move_home();
        buf.delete();
        assert_eq!(buf.text(), "b");
        assert_eq!(buf.cursor_column(), 0);

        buf.backspace();
        assert_eq!(buf.text(), "b");
    }

    #[test]
    fn test_movement_over_multibyte() {
        let mut buf = typed("Zoë");
        assert_eq!(buf.cursor_column(), 3);
        buf.move_left();
        assert_eq!(buf.cursor_column(), 2);
        buf.insert_char('-');
        assert_eq!(buf.text(), "Zo-ë");
        buf.move_end();
        buf.move_right();
        assert_eq!(buf.cursor_column(), 4);
    }

    #[test]
    fn test_set_text_moves_cursor_to_end() {
        let mut buf = typed("x");
        buf.set_text("Aria");
        assert_eq!(buf.text(), "Aria");
        assert_eq!(buf.cursor_column(), 4);
        buf.clear();
        assert_eq!(buf, InputBuffer::new());
    }
}
