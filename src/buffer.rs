//! Buffer representation - the edited source as a collection of lines

use std::path::{Path, PathBuf};

use crate::line::Line;

/// A buffer containing the source text under analysis
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text
    lines: Vec<Line>,
    /// Buffer name shown on the mode line
    name: String,
    /// Associated file path (None for scratch buffers)
    filename: Option<PathBuf>,
    /// Whether buffer changed since it was loaded
    modified: bool,
}

impl Buffer {
    /// Create a buffer holding `text`
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        let mut buffer = Self {
            lines: Vec::new(),
            name: name.into(),
            filename: None,
            modified: false,
        };
        buffer.set_text(text);
        buffer.modified = false;
        buffer
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut buffer = Self::new(name, &content);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    /// Get buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Whole text, lines joined with `\n`
    pub fn text(&self) -> String {
        let lines: Vec<&str> = self.lines.iter().map(Line::text).collect();
        lines.join("\n")
    }

    /// Replace the whole text
    pub fn set_text(&mut self, text: &str) {
        // split, not lines(), so a trailing newline keeps its empty last line
        self.lines = text.split('\n').map(|l| Line::from(l.strip_suffix('\r').unwrap_or(l))).collect();
        self.modified = true;
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.modified = true;
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let new_line = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, new_line);
            self.modified = true;
        }
    }

    /// Delete the character at position, joining with the next line at end of line
    pub fn delete_forward(&mut self, line_idx: usize, byte_pos: usize) -> bool {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return false;
        };
        if byte_pos < line.len() {
            let end = line.next_boundary(byte_pos);
            line.delete_range(byte_pos, end);
            self.modified = true;
            true
        } else {
            self.join_line(line_idx)
        }
    }

    /// Delete backward (backspace), returns the new cursor position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(usize, usize)> {
        if byte_pos == 0 {
            return self.join_with_previous(line_idx).map(|pos| (line_idx - 1, pos));
        }
        let line = self.lines.get_mut(line_idx)?;
        let start = line.prev_boundary(byte_pos);
        line.delete_range(start, byte_pos);
        self.modified = true;
        Some((line_idx, start))
    }

    /// Join line with the next line (delete newline at end of line)
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 < self.lines.len() {
            let next_line = self.lines.remove(line_idx + 1);
            self.lines[line_idx].append(next_line);
            self.modified = true;
            return true;
        }
        false
    }

    /// Join with previous line (when backspacing at start of line)
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx > 0 && line_idx < self.lines.len() {
            let current_line = self.lines.remove(line_idx);
            let prev_line = &mut self.lines[line_idx - 1];
            let join_pos = prev_line.len();
            prev_line.append(current_line);
            self.modified = true;
            return Some(join_pos);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_roundtrip() {
        let buffer = Buffer::new("*scratch*", "// type code here\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.text(), "// type code here\n");
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_crlf_is_normalised() {
        let buffer = Buffer::new("t", "a\r\nb");
        assert_eq!(buffer.text(), "a\nb");
    }

    #[test]
    fn test_insert_and_newline() {
        let mut buffer = Buffer::new("t", "bindx");
        buffer.insert_char(0, 4, ' ');
        buffer.insert_newline(0, 4);
        assert_eq!(buffer.text(), "bind\n x");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_delete_backward_joins_lines() {
        let mut buffer = Buffer::new("t", "ab\ncd");
        assert_eq!(buffer.delete_backward(1, 0), Some((0, 2)));
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.delete_backward(0, 0), None);
        assert_eq!(buffer.delete_backward(0, 4), Some((0, 3)));
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_delete_forward() {
        let mut buffer = Buffer::new("t", "é\nx");
        assert!(buffer.delete_forward(0, 0));
        assert_eq!(buffer.text(), "\nx");
        assert!(buffer.delete_forward(0, 0));
        assert_eq!(buffer.text(), "x");
        assert!(!buffer.delete_forward(0, 1));
    }
}
