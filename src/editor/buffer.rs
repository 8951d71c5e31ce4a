use ropey::Rope;

/// Cursor position in a field buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Chars ropey treats as line breaks (CRLF is two of these).
const LINE_BREAKS: [char; 7] = [
    '\n', '\r', '\u{000B}', '\u{000C}', '\u{0085}', '\u{2028}', '\u{2029}',
];

/// Text input for one page field.
///
/// Columns count chars, matching how field lengths are validated, so the
/// cursor never lands inside a multi-byte character.
pub struct FieldBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
}

impl FieldBuffer {
    /// Create a buffer holding `text` with the cursor at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            dirty: false,
        }
    }

    /// Create a buffer holding `text` with the cursor after the last char.
    pub fn at_end(text: &str) -> Self {
        let mut buf = Self::from_text(text);
        buf.move_to_end();
        buf
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the text changed since the buffer was created.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its line break.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches(LINE_BREAKS).to_string())
    }

    /// Length of a line in chars, without its line break.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        self.cursor.set_col(self.cursor.col + 1);
        self.dirty = true;
    }

    /// Break the line at the cursor.
    pub fn split_line(&mut self) {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.dirty = true;
    }

    /// Delete the char before the cursor, joining lines at column 0.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }
        let idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            let prev_len = self.line_len(prev);
            let join_at = self.rope.line_to_char(prev) + prev_len;
            self.rope.remove(join_at..idx);
            self.cursor.line = prev;
            self.cursor.set_col(prev_len);
        } else {
            self.rope.remove(idx - 1..idx);
            self.cursor.set_col(self.cursor.col - 1);
        }
        self.dirty = true;
        true
    }

    /// Delete the char at the cursor, joining lines at line end.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.rope.remove(idx..=idx);
        } else if self.cursor.line + 1 < self.line_count() {
            let next_start = self.rope.line_to_char(self.cursor.line + 1);
            self.rope.remove(idx..next_start);
        } else {
            return false;
        }
        self.dirty = true;
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        self.cursor.set_col(self.line_len(self.cursor.line));
    }

    /// Move to a position, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        self.cursor.set_col(col.min(self.line_len(self.cursor.line)));
    }

    pub fn move_to_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.cursor.line = last;
        self.cursor.set_col(self.line_len(last));
    }

    fn cursor_char_idx(&self) -> usize {
        let col = self.cursor.col.min(self.line_len(self.cursor.line));
        self.rope.line_to_char(self.cursor.line) + col
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(target) = self.cursor.line.checked_add_signed(delta) else {
            return;
        };
        if target >= self.line_count() {
            return;
        }
        self.cursor.line = target;
        self.cursor.col = self.cursor.col_memory.min(self.line_len(target));
    }
}

impl std::fmt::Debug for FieldBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = FieldBuffer::from_text("");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_unicode_line_separators_are_not_content() {
        let mut buf = FieldBuffer::from_text("one\u{2028}two\u{000C}three");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_at(0), Some("one".to_string()));
        assert_eq!(buf.line_len(1), 3);

        buf.move_end();
        buf.insert_char('!');
        assert_eq!(buf.text(), "one!\u{2028}two\u{000C}three");
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = FieldBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert_eq!(buf.text(), "hello\nworld");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_at_end_places_cursor_after_text() {
        let buf = FieldBuffer::at_end("hello\nworld");
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
    }

    // --- Editing ---

    #[test]
    fn test_insert_char_at_cursor() {
        let mut buf = FieldBuffer::from_text("hllo");
        buf.move_to(0, 1);
        buf.insert_char('e');
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor().col, 2);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_insert_newline_splits() {
        let mut buf = FieldBuffer::from_text("helloworld");
        buf.move_to(0, 5);
        buf.insert_char('\n');
        assert_eq!(buf.text(), "hello\nworld");
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = FieldBuffer::from_text("abc");
        assert!(!buf.delete_back());
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = FieldBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_joins_crlf_lines() {
        let mut buf = FieldBuffer::from_text("hello\r\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "helloworld");
    }

    #[test]
    fn test_delete_forward_removes_char_and_joins() {
        let mut buf = FieldBuffer::from_text("ab\ncd");
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "b\ncd");
        buf.move_end();
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "bcd");
        buf.move_to_end();
        assert!(!buf.delete_forward());
    }

    // --- Multi-byte characters ---

    #[test]
    fn test_columns_count_chars() {
        let mut buf = FieldBuffer::at_end("café");
        assert_eq!(buf.cursor().col, 4);
        buf.move_cursor(Direction::Left);
        buf.insert_char('x');
        assert_eq!(buf.text(), "cafxé");
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = FieldBuffer::at_end("日本語");
        buf.delete_back();
        assert_eq!(buf.text(), "日本");
    }

    // --- Movement ---

    #[test]
    fn test_left_right_wrap_lines() {
        let mut buf = FieldBuffer::from_text("ab\ncd");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_vertical_movement_keeps_column_memory() {
        let mut buf = FieldBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().line, 2);
        buf.move_to(0, 0);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_home_end() {
        let mut buf = FieldBuffer::from_text("hello");
        buf.move_end();
        assert_eq!(buf.cursor().col, 5);
        buf.move_home();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = FieldBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }
}
