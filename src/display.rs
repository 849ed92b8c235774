//! Display rendering
//!
//! The screen is split into the editor pane and its mode line, the token
//! table pane, and the minibuffer on the last row.

use std::ops::Range;

use unicode_width::UnicodeWidthChar;

use crate::decoration::Decoration;
use crate::editor::TerminalEditor;
use crate::error::Result;
use crate::session::Session;
use crate::surface::KeyChord;
use crate::syntax::Style;
use crate::table::{self, HEADERS};
use crate::terminal::Terminal;

/// Rows given to each pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Text rows of the editor pane
    pub editor_rows: u16,
    /// Row of the editor mode line
    pub mode_line: u16,
    /// Rows of the token table, header included
    pub table_rows: u16,
    /// Row of the minibuffer
    pub minibuffer: u16,
}

impl Layout {
    /// Split a screen of `rows` lines, three fifths to the editor
    pub fn for_rows(rows: u16) -> Self {
        let rows = rows.max(3);
        let available = rows - 2;
        let editor_rows = ((available as u32 * 3).div_ceil(5) as u16).max(1);
        Self {
            editor_rows,
            mode_line: editor_rows,
            table_rows: available - editor_rows,
            minibuffer: rows - 1,
        }
    }
}

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    pub show_line_numbers: bool,
    pub tab_width: usize,
    /// Chord advertised on the mode line
    trigger: KeyChord,
}

impl Display {
    pub fn new(show_line_numbers: bool, tab_width: usize, trigger: KeyChord) -> Self {
        Self {
            needs_redraw: true,
            show_line_numbers,
            tab_width: tab_width.max(1),
            trigger,
        }
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Calculate width needed for line numbers (including separator)
    fn line_number_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        line_count.max(1).to_string().len().max(3) + 1
    }

    /// Render the whole screen
    pub fn render(
        &mut self,
        terminal: &mut Terminal,
        editor: &TerminalEditor,
        session: &Session,
    ) -> Result<()> {
        let cols = terminal.cols() as usize;
        let layout = Layout::for_rows(terminal.rows());

        if self.needs_redraw {
            terminal.clear_screen()?;
        }
        terminal.set_cursor_visible(false)?;

        self.render_editor(terminal, editor, &layout, cols)?;
        self.render_mode_line(terminal, editor, session, layout.mode_line, cols)?;
        self.render_table(terminal, editor, session, &layout, cols)?;
        self.render_minibuffer(terminal, session, layout.minibuffer, cols)?;
        self.position_cursor(terminal, editor, cols)?;

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;
        self.needs_redraw = false;
        Ok(())
    }

    fn render_editor(
        &self,
        terminal: &mut Terminal,
        editor: &TerminalEditor,
        layout: &Layout,
        cols: usize,
    ) -> Result<()> {
        let buffer = editor.buffer();
        let top_line = editor.window().top_line();
        let lnum_width = self.line_number_width(buffer.line_count());
        let text_cols = cols.saturating_sub(lnum_width);

        for row_offset in 0..layout.editor_rows {
            let line_idx = top_line + row_offset as usize;
            terminal.move_cursor(row_offset, 0)?;

            if let Some(line) = buffer.line(line_idx) {
                if self.show_line_numbers {
                    terminal.set_dim(true)?;
                    terminal.write_str(&format!("{:>width$} ", line_idx + 1, width = lnum_width - 1))?;
                    terminal.set_dim(false)?;
                }
                let decorations = editor.decorations_on_line(line_idx);
                self.render_decorated_line(terminal, line.text(), &decorations, text_cols)?;
            } else {
                terminal.set_dim(true)?;
                terminal.write_str("~")?;
                terminal.set_dim(false)?;
            }
            terminal.clear_to_eol()?;
        }
        Ok(())
    }

    fn render_decorated_line(
        &self,
        terminal: &mut Terminal,
        text: &str,
        decorations: &[&Decoration],
        max_cols: usize,
    ) -> Result<()> {
        let mut col = 0;
        for (range, style) in styled_segments(text, decorations) {
            if col >= max_cols {
                break;
            }
            let piece = expand_tabs(&text[range], col, self.tab_width);
            let piece = truncate_to_width(&piece, max_cols - col);
            col += display_width(&piece);
            match style {
                Some(style) => {
                    terminal.apply_style(&style)?;
                    terminal.write_str(&piece)?;
                    terminal.reset_attributes()?;
                }
                None => terminal.write_str(&piece)?,
            }
        }
        Ok(())
    }

    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        editor: &TerminalEditor,
        session: &Session,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        let buffer = editor.buffer();
        let modified = if buffer.is_modified() { "**" } else { "--" };
        let file = buffer
            .filename()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no file".to_string());
        let status = if session.is_loading() { "Running..." } else { "Ready" };

        let mode_line = format!(
            "{}- synta-view: {} ({}) L{}  [{}]  {} tokens  {} runs analysis ",
            modified,
            buffer.name(),
            file,
            editor.window().cursor_line() + 1,
            status,
            session.rows().len(),
            self.trigger,
        );

        terminal.move_cursor(row, 0)?;
        terminal.apply_style(&Style::reverse())?;
        terminal.write_str(&pad_to_width(&mode_line, cols, '-'))?;
        terminal.reset_attributes()?;
        Ok(())
    }

    fn render_table(
        &self,
        terminal: &mut Terminal,
        editor: &TerminalEditor,
        session: &Session,
        layout: &Layout,
        cols: usize,
    ) -> Result<()> {
        if layout.table_rows == 0 {
            return Ok(());
        }
        let first_row = layout.mode_line + 1;
        let cells = table::escaped_cells(session.rows());
        let widths = table::column_widths(&cells);

        terminal.move_cursor(first_row, 0)?;
        terminal.apply_style(&Style::reverse())?;
        let header = table::format_row(&HEADERS.map(String::from), &widths);
        terminal.write_str(&pad_to_width(&header, cols, ' '))?;
        terminal.reset_attributes()?;

        let mut visible = cells.iter().skip(editor.table_top());
        for offset in 1..layout.table_rows {
            terminal.move_cursor(first_row + offset, 0)?;
            if let Some(row) = visible.next() {
                terminal.write_str(&truncate_to_width(&table::format_row(row, &widths), cols))?;
            }
            terminal.clear_to_eol()?;
        }
        Ok(())
    }

    fn render_minibuffer(
        &self,
        terminal: &mut Terminal,
        session: &Session,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        if let Some(message) = session.error() {
            let line = format!("Analysis failed: {}", message);
            terminal.write_str(&truncate_to_width(&line, cols))?;
        }
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Position the hardware cursor at the editor's cursor
    fn position_cursor(
        &self,
        terminal: &mut Terminal,
        editor: &TerminalEditor,
        cols: usize,
    ) -> Result<()> {
        let buffer = editor.buffer();
        let window = editor.window();
        let display_col = buffer.line(window.cursor_line()).map_or(0, |line| {
            let before = &line.text()[..line.char_to_byte(line.byte_to_char(window.cursor_col()))];
            display_width(&expand_tabs(before, 0, self.tab_width))
        });

        let lnum_width = self.line_number_width(buffer.line_count());
        let screen_row = window.cursor_line().saturating_sub(window.top_line()) as u16;
        let screen_col = (lnum_width + display_col).min(cols.saturating_sub(1)) as u16;
        terminal.move_cursor(screen_row, screen_col)
    }
}

/// Split `text` into byte ranges with the style that applies to each
///
/// Decorations must be ordered by start column. Where two overlap, the
/// earlier one keeps the shared characters.
pub fn styled_segments(text: &str, decorations: &[&Decoration]) -> Vec<(Range<usize>, Option<Style>)> {
    let line = crate::line::Line::from(text);
    let mut segments = Vec::new();
    let mut pos = 0;

    for decoration in decorations {
        let range = decoration.range;
        let Some((start, end)) = line.column_span(range.start_column, range.end_column) else {
            continue;
        };
        let start = start.max(pos);
        if start >= end {
            continue;
        }
        if pos < start {
            segments.push((pos..start, None));
        }
        segments.push((start..end, Some(decoration.category.default_style())));
        pos = end;
    }
    if pos < text.len() {
        segments.push((pos..text.len(), None));
    }
    segments
}

/// Replace tabs with spaces, given the display column `start_col` the text begins at
fn expand_tabs(s: &str, start_col: usize, tab_width: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut col = start_col;
    for ch in s.chars() {
        if ch == '\t' {
            let spaces = tab_width - col % tab_width;
            out.push_str(&" ".repeat(spaces));
            col += spaces;
        } else {
            out.push(ch);
            col += ch.width().unwrap_or(1);
        }
    }
    out
}

fn display_width(s: &str) -> usize {
    s.chars().map(|ch| ch.width().unwrap_or(1)).sum()
}

fn pad_to_width(s: &str, width: usize, fill: char) -> String {
    let mut out = truncate_to_width(s, width);
    let used = display_width(&out);
    out.extend(std::iter::repeat(fill).take(width.saturating_sub(used)));
    out
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{DisplayRange, StyleCategory};

    fn deco(start: i64, end: i64, category: StyleCategory) -> Decoration {
        Decoration::new(DisplayRange::new(1, start, 1, end), category)
    }

    #[test]
    fn test_layout_split() {
        let layout = Layout::for_rows(24);
        assert_eq!(layout.editor_rows, 14);
        assert_eq!(layout.mode_line, 14);
        assert_eq!(layout.table_rows, 8);
        assert_eq!(layout.minibuffer, 23);

        let tiny = Layout::for_rows(1);
        assert_eq!(tiny.editor_rows, 1);
        assert_eq!(tiny.table_rows, 0);
    }

    #[test]
    fn test_styled_segments_scenario_line() {
        let kw = deco(1, 5, StyleCategory::Keyword);
        let num = deco(10, 11, StyleCategory::Number);
        let segments = styled_segments("bind x = 1", &[&kw, &num]);

        let ranges: Vec<_> = segments.iter().map(|(r, _)| r.clone()).collect();
        assert_eq!(ranges, vec![0..4, 4..9, 9..10]);
        assert_eq!(segments[0].1, Some(StyleCategory::Keyword.default_style()));
        assert_eq!(segments[1].1, None);
        assert_eq!(segments[2].1, Some(StyleCategory::Number.default_style()));
    }

    #[test]
    fn test_styled_segments_overlap_and_overflow() {
        let a = deco(1, 4, StyleCategory::String);
        let b = deco(3, 6, StyleCategory::Operator);
        let past = deco(20, 22, StyleCategory::Illegal);
        let segments = styled_segments("abcdefg", &[&a, &b, &past]);

        let ranges: Vec<_> = segments.iter().map(|(r, _)| r.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..5, 5..7]);
        assert_eq!(segments[1].1, Some(StyleCategory::Operator.default_style()));
    }

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tx", 0, 4), "    x");
        assert_eq!(expand_tabs("ab\tx", 0, 4), "ab  x");
        assert_eq!(expand_tabs("\t", 3, 4), " ");
    }

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate_to_width("你好世界", 5), "你好");
        assert_eq!(pad_to_width("ab", 5, '-'), "ab---");
        assert_eq!(pad_to_width("abcdef", 3, '-'), "abc");
    }
}
