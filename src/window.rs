//! Window representation - a viewport into the source buffer

/// The visible portion of the buffer and the cursor within it
#[derive(Debug, Default)]
pub struct Window {
    /// First visible line in the window
    top_line: usize,
    /// Cursor line position (0-indexed)
    cursor_line: usize,
    /// Cursor column position (byte offset within line)
    cursor_col: usize,
    /// Number of text rows in window (excluding mode line)
    height: u16,
    /// Goal column (display columns) for vertical movement
    goal_col: usize,
}

impl Window {
    /// Create a new window of the given height
    pub fn new(height: u16) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    /// Get the top visible line
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// Get cursor line
    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    /// Get cursor column (byte offset)
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Set cursor position
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        self.cursor_line = line;
        self.cursor_col = col;
    }

    /// Get the goal column for vertical movement
    pub fn goal_col(&self) -> usize {
        self.goal_col
    }

    /// Set the goal column
    pub fn set_goal_col(&mut self, col: usize) {
        self.goal_col = col;
    }

    /// Get window height in rows
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Set window height
    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.ensure_cursor_visible();
    }

    /// Ensure cursor is visible, adjusting top_line if needed
    pub fn ensure_cursor_visible(&mut self) {
        let height = (self.height as usize).max(1);
        if self.cursor_line < self.top_line {
            self.top_line = self.cursor_line;
        } else if self.cursor_line >= self.top_line + height {
            self.top_line = self.cursor_line - height + 1;
        }
    }
}
