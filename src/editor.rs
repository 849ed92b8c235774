//! Terminal editor surface
//!
//! Holds the edited text, the cursor and the installed decorations, and
//! turns keys into [`SurfaceEvent`]s. It knows nothing about analysis; the
//! app loop feeds its events to the session.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::buffer::Buffer;
use crate::decoration::{Decoration, DecorationHandle};
use crate::input::{special, Key};
use crate::surface::{EditorSurface, KeyChord, SurfaceEvent};
use crate::window::Window;

/// Text shown in a fresh scratch buffer
pub const SCRATCH_TEXT: &str = "// type code here\n";

/// Editor state behind the terminal view
#[derive(Debug)]
pub struct TerminalEditor {
    buffer: Buffer,
    window: Window,
    /// Keys that raise [`SurfaceEvent::Trigger`]
    triggers: HashSet<Key>,
    /// Installed decorations, keyed by the handle given out for them
    decorations: BTreeMap<DecorationHandle, Decoration>,
    next_handle: u64,
    /// First visible row of the token table
    table_top: usize,
}

impl TerminalEditor {
    /// Create an editor over a buffer
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            window: Window::new(1),
            triggers: HashSet::new(),
            decorations: BTreeMap::new(),
            next_handle: 0,
            table_top: 0,
        }
    }

    /// Editor over the scratch buffer
    pub fn scratch() -> Self {
        Self::new(Buffer::new("*scratch*", SCRATCH_TEXT))
    }

    /// Editor over a file's contents
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(Buffer::from_file(path)?))
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn table_top(&self) -> usize {
        self.table_top
    }

    /// Number of decorations currently installed
    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    /// Decorations starting on a 0-based buffer line, ordered by column
    pub fn decorations_on_line(&self, line_idx: usize) -> Vec<&Decoration> {
        let line_no = line_idx as i64 + 1;
        let mut on_line: Vec<_> = self
            .decorations
            .values()
            .filter(|d| d.range.start_line == line_no)
            .collect();
        on_line.sort_by_key(|d| d.range.start_column);
        on_line
    }

    /// Process one key press
    ///
    /// `table_rows` bounds scrolling of the token table.
    pub fn handle_key(&mut self, key: Key, table_rows: usize) -> Option<SurfaceEvent> {
        if self.triggers.contains(&key) {
            return Some(SurfaceEvent::Trigger);
        }
        if key == Key::ctlx_ctrl('c') {
            return Some(SurfaceEvent::Quit);
        }

        if let Some(ch) = key.as_char() {
            self.insert_char(ch);
            return Some(SurfaceEvent::Edited);
        }

        let edited = match key {
            k if k == Key::ctrl('m') => {
                self.newline();
                true
            }
            k if k == Key::ctrl('i') => {
                self.insert_char('\t');
                true
            }
            Key(0x7f) => self.backspace(),
            k if k == Key::ctrl('d') || k == Key::special(special::DELETE) => self.delete(),
            k if k == Key::ctrl('f') || k == Key::special(special::RIGHT) => {
                self.forward_char();
                false
            }
            k if k == Key::ctrl('b') || k == Key::special(special::LEFT) => {
                self.backward_char();
                false
            }
            k if k == Key::ctrl('n') || k == Key::special(special::DOWN) => {
                self.move_line(1);
                false
            }
            k if k == Key::ctrl('p') || k == Key::special(special::UP) => {
                self.move_line(-1);
                false
            }
            k if k == Key::ctrl('a') || k == Key::special(special::HOME) => {
                self.set_cursor(self.window.cursor_line(), 0);
                false
            }
            k if k == Key::ctrl('e') || k == Key::special(special::END) => {
                let line = self.window.cursor_line();
                let end = self.buffer.line(line).map_or(0, |l| l.len());
                self.set_cursor(line, end);
                false
            }
            k if k == Key::ctrl('v') || k == Key::special(special::PAGE_DOWN) => {
                self.move_line(self.page());
                false
            }
            k if k == Key::meta('v') || k == Key::special(special::PAGE_UP) => {
                self.move_line(-self.page());
                false
            }
            k if k == Key::meta('n') => {
                self.table_top = (self.table_top + 1).min(table_rows.saturating_sub(1));
                false
            }
            k if k == Key::meta('p') => {
                self.table_top = self.table_top.saturating_sub(1);
                false
            }
            _ => false,
        };

        edited.then_some(SurfaceEvent::Edited)
    }

    fn page(&self) -> isize {
        (self.window.height() as isize - 1).max(1)
    }

    fn set_cursor(&mut self, line: usize, col: usize) {
        self.window.set_cursor(line, col);
        let goal = self.buffer.line(line).map_or(0, |l| l.byte_to_col(col));
        self.window.set_goal_col(goal);
        self.window.ensure_cursor_visible();
    }

    fn insert_char(&mut self, ch: char) {
        let (line, col) = (self.window.cursor_line(), self.window.cursor_col());
        self.buffer.insert_char(line, col, ch);
        self.set_cursor(line, col + ch.len_utf8());
    }

    fn newline(&mut self) {
        let (line, col) = (self.window.cursor_line(), self.window.cursor_col());
        self.buffer.insert_newline(line, col);
        self.set_cursor(line + 1, 0);
    }

    fn backspace(&mut self) -> bool {
        let (line, col) = (self.window.cursor_line(), self.window.cursor_col());
        match self.buffer.delete_backward(line, col) {
            Some((line, col)) => {
                self.set_cursor(line, col);
                true
            }
            None => false,
        }
    }

    fn delete(&mut self) -> bool {
        self.buffer
            .delete_forward(self.window.cursor_line(), self.window.cursor_col())
    }

    fn forward_char(&mut self) {
        let (line, col) = (self.window.cursor_line(), self.window.cursor_col());
        let Some(text) = self.buffer.line(line) else {
            return;
        };
        if col < text.len() {
            self.set_cursor(line, text.next_boundary(col));
        } else if line + 1 < self.buffer.line_count() {
            self.set_cursor(line + 1, 0);
        }
    }

    fn backward_char(&mut self) {
        let (line, col) = (self.window.cursor_line(), self.window.cursor_col());
        if col > 0 {
            let prev = self.buffer.line(line).map_or(0, |l| l.prev_boundary(col));
            self.set_cursor(line, prev);
        } else if line > 0 {
            let end = self.buffer.line(line - 1).map_or(0, |l| l.len());
            self.set_cursor(line - 1, end);
        }
    }

    fn move_line(&mut self, delta: isize) {
        let last = self.buffer.line_count().saturating_sub(1);
        let target = self
            .window
            .cursor_line()
            .saturating_add_signed(delta)
            .min(last);
        let goal = self.window.goal_col();
        let col = self
            .buffer
            .line(target)
            .map_or(0, |l| byte_at_display_col(l.text(), goal));
        self.window.set_cursor(target, col);
        self.window.ensure_cursor_visible();
    }
}

/// Byte offset of the character covering display column `col`, clamped
fn byte_at_display_col(text: &str, col: usize) -> usize {
    let mut width = 0;
    for (pos, ch) in text.char_indices() {
        if width >= col {
            return pos;
        }
        width += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
    }
    text.len()
}

impl EditorSurface for TerminalEditor {
    fn text(&self) -> String {
        self.buffer.text()
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        let last = self.buffer.line_count().saturating_sub(1);
        let line = self.window.cursor_line().min(last);
        let col = self.window.cursor_col();
        let col = self.buffer.line(line).map_or(0, |l| {
            let ch = l.byte_to_char(col);
            l.char_to_byte(ch)
        });
        self.set_cursor(line, col);
    }

    fn bind_trigger(&mut self, chord: KeyChord) {
        self.triggers.insert(chord.key());
    }

    fn replace_decorations(
        &mut self,
        previous: &[DecorationHandle],
        next: &[Decoration],
    ) -> Vec<DecorationHandle> {
        for handle in previous {
            self.decorations.remove(handle);
        }
        next.iter()
            .map(|decoration| {
                self.next_handle += 1;
                let handle = DecorationHandle(self.next_handle);
                self.decorations.insert(handle, decoration.clone());
                handle
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{DisplayRange, StyleCategory};

    fn type_str(editor: &mut TerminalEditor, s: &str) {
        for ch in s.chars() {
            editor.handle_key(Key::char(ch), 0);
        }
    }

    #[test]
    fn test_typing_raises_edited() {
        let mut editor = TerminalEditor::new(Buffer::new("t", ""));
        assert_eq!(editor.handle_key(Key::char('b'), 0), Some(SurfaceEvent::Edited));
        type_str(&mut editor, "ind x");
        editor.handle_key(Key::ctrl('m'), 0);
        type_str(&mut editor, "x");
        assert_eq!(editor.text(), "bind x\nx");
        assert_eq!(editor.window().cursor_line(), 1);
    }

    #[test]
    fn test_trigger_and_quit() {
        let mut editor = TerminalEditor::scratch();
        editor.bind_trigger(KeyChord::parse("F5").unwrap());
        assert_eq!(editor.handle_key(Key::function(5), 0), Some(SurfaceEvent::Trigger));
        assert_eq!(editor.handle_key(Key::ctrl('r'), 0), None);
        assert_eq!(editor.handle_key(Key::ctlx_ctrl('c'), 0), Some(SurfaceEvent::Quit));
        assert_eq!(editor.text(), SCRATCH_TEXT);
    }

    #[test]
    fn test_navigation_does_not_edit() {
        let mut editor = TerminalEditor::new(Buffer::new("t", "ab\ncd"));
        assert_eq!(editor.handle_key(Key::ctrl('n'), 0), None);
        assert_eq!(editor.handle_key(Key::ctrl('e'), 0), None);
        assert_eq!(editor.window().cursor_col(), 2);
        assert_eq!(editor.handle_key(Key(0x7f), 0), Some(SurfaceEvent::Edited));
        assert_eq!(editor.text(), "ab\nc");
        // backspace at buffer start changes nothing
        let mut editor = TerminalEditor::new(Buffer::new("t", "ab"));
        assert_eq!(editor.handle_key(Key(0x7f), 0), None);
    }

    #[test]
    fn test_replace_decorations_is_wholesale() {
        let mut editor = TerminalEditor::scratch();
        let kw = Decoration::new(DisplayRange::new(1, 1, 1, 5), StyleCategory::Keyword);
        let num = Decoration::new(DisplayRange::new(1, 10, 1, 11), StyleCategory::Number);
        let first = editor.replace_decorations(&[], &[num.clone(), kw.clone()]);
        assert_eq!(editor.decoration_count(), 2);

        let on_line: Vec<_> = editor.decorations_on_line(0).into_iter().cloned().collect();
        assert_eq!(on_line, vec![kw.clone(), num]);

        let second = editor.replace_decorations(&first, &[kw]);
        assert_eq!(second.len(), 1);
        assert_eq!(editor.decoration_count(), 1);
        assert!(editor.decorations_on_line(1).is_empty());
    }

    #[test]
    fn test_set_text_clamps_cursor() {
        let mut editor = TerminalEditor::new(Buffer::new("t", "long line\nsecond"));
        editor.handle_key(Key::ctrl('n'), 0);
        editor.handle_key(Key::ctrl('e'), 0);
        editor.set_text("x");
        assert_eq!(editor.window().cursor_line(), 0);
        assert_eq!(editor.window().cursor_col(), 1);
    }

    #[test]
    fn test_table_scroll_bounds() {
        let mut editor = TerminalEditor::scratch();
        editor.handle_key(Key::meta('n'), 2);
        editor.handle_key(Key::meta('n'), 2);
        assert_eq!(editor.table_top(), 1);
        editor.handle_key(Key::meta('p'), 2);
        editor.handle_key(Key::meta('p'), 2);
        assert_eq!(editor.table_top(), 0);
    }
}
