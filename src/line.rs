//! Line representation and text operations

use unicode_width::UnicodeWidthStr;

/// A single line of text in a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// The text content (without trailing newline)
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line from a string
    pub fn from_string(s: String) -> Self {
        Self { text: s }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        self.text.drain(start..end).collect()
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        Line::from_string(self.text.split_off(byte_pos))
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(other.text());
    }

    /// Get display column for a given byte position
    pub fn byte_to_col(&self, byte_pos: usize) -> usize {
        self.text[..self.floor_char_boundary(byte_pos)].width()
    }

    /// Get the byte position of a 0-based character index, clamped to the line end
    pub fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(pos, _)| pos)
            .unwrap_or(self.text.len())
    }

    /// Get the character index for a given byte position
    pub fn byte_to_char(&self, byte_pos: usize) -> usize {
        self.text[..self.floor_char_boundary(byte_pos)].chars().count()
    }

    /// Byte range covered by 1-based character columns `[start, end)`
    ///
    /// Columns past the end of the line are clamped. Returns None when
    /// nothing of the range lies on this line.
    pub fn column_span(&self, start_col: i64, end_col: i64) -> Option<(usize, usize)> {
        let start_idx = usize::try_from(start_col.max(1) - 1).ok()?;
        let end_idx = usize::try_from(end_col.max(1) - 1).ok()?;
        let start = self.char_to_byte(start_idx);
        let end = self.char_to_byte(end_idx);
        (start < end).then_some((start, end))
    }

    /// Byte position of the previous character boundary
    pub fn prev_boundary(&self, byte_pos: usize) -> usize {
        self.text[..self.floor_char_boundary(byte_pos)]
            .char_indices()
            .last()
            .map(|(pos, _)| pos)
            .unwrap_or(0)
    }

    /// Byte position of the next character boundary
    pub fn next_boundary(&self, byte_pos: usize) -> usize {
        let pos = self.floor_char_boundary(byte_pos);
        self.text[pos..]
            .chars()
            .next()
            .map(|ch| pos + ch.len_utf8())
            .unwrap_or(self.text.len())
    }

    /// Find the nearest valid UTF-8 char boundary at or before `pos`
    fn floor_char_boundary(&self, pos: usize) -> usize {
        if pos >= self.text.len() {
            return self.text.len();
        }
        let mut p = pos;
        while p > 0 && !self.text.is_char_boundary(p) {
            p -= 1;
        }
        p
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::from_string(s.to_string())
    }
}
