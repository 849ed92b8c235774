//! Token table projection
//!
//! Rows mirror the decoration pipeline's filter so both views always show
//! the same tokens.

use unicode_width::UnicodeWidthStr;

use crate::syntax::displayable;
use crate::token::Token;

/// Column headers, in row field order
pub const HEADERS: [&str; 5] = ["Lexeme", "Type", "Line", "Col", "Value"];

/// One row of the token inspector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub lexeme: String,
    pub kind: String,
    pub line: i64,
    pub column: i64,
    /// Decoded value, or empty when the token has none
    pub value: String,
}

impl TableRow {
    /// Cells as display strings, in [`HEADERS`] order
    pub fn cells(&self) -> [String; 5] {
        [
            self.lexeme.clone(),
            self.kind.clone(),
            self.line.to_string(),
            self.column.to_string(),
            self.value.clone(),
        ]
    }
}

/// Project displayable tokens into table rows, preserving order
pub fn project(tokens: &[Token]) -> Vec<TableRow> {
    displayable(tokens)
        .map(|token| TableRow {
            lexeme: token.lexeme.clone(),
            kind: token.kind.clone(),
            line: token.line,
            column: token.column,
            value: token.value.clone().unwrap_or_default(),
        })
        .collect()
}

/// Render rows as an aligned plain-text table with a header line
///
/// Control characters in cells are shown escaped so multi-line lexemes
/// keep to a single row.
pub fn render_table(rows: &[TableRow]) -> String {
    let cells = escaped_cells(rows);
    let widths = column_widths(&cells);

    let mut out = format_row(&HEADERS.map(String::from), &widths);
    out.push('\n');
    for row in &cells {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    out
}

/// Row cells with control characters escaped
pub fn escaped_cells(rows: &[TableRow]) -> Vec<[String; 5]> {
    rows.iter()
        .map(|row| row.cells().map(|cell| escape_cell(&cell)))
        .collect()
}

/// Display width of each column, header included
pub fn column_widths(cells: &[[String; 5]]) -> [usize; 5] {
    let mut widths = HEADERS.map(|h| h.width());
    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }
    widths
}

/// Join cells padded to `widths`, two spaces apart, without trailing blanks
pub fn format_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    line.truncate(line.trim_end().len());
    line
}

/// Escape control characters for single-line display
pub fn escape_cell(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_tokens() -> Vec<Token> {
        vec![
            Token::new("BIND", "bind", 1, 1),
            Token::new("IDENTIFIER", "x", 1, 6),
            Token::new("ASSIGN", "=", 1, 8),
            Token::new("INTEGER", "1", 1, 10).with_value("1"),
            Token::new("NEWLINE", "\n", 2, 1),
        ]
    }

    #[test]
    fn test_project_excludes_newline() {
        let rows = project(&scenario_tokens());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].lexeme, "bind");
        assert_eq!(rows[3].kind, "INTEGER");
        assert_eq!(rows[3].value, "1");
        assert_eq!(rows[1].value, "");
    }

    #[test]
    fn test_project_never_surfaces_extra() {
        let mut token = Token::new("IDENTIFIER", "x", 1, 1);
        token.extra = Some(serde_json::json!({"secret": "payload"}));
        let rows = project(&[token]);
        assert!(rows[0].cells().iter().all(|c| !c.contains("payload")));
    }

    #[test]
    fn test_project_same_filter_as_decorations() {
        let tokens = vec![
            Token::new("IDENTIFIER", "", 1, 1),
            Token::new("IDENTIFIER", "y", 0, 1),
            Token::new("newline", "x", 1, 1),
            Token::new("STRING", "\\n", 1, 1),
            Token::new("STRING", "ok", 1, 1),
        ];
        assert_eq!(project(&tokens).len(), crate::decoration::build_decorations(&tokens).len());
        assert_eq!(project(&tokens).len(), 1);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let text = render_table(&project(&scenario_tokens()));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Lexeme  Type        Line  Col  Value");
        assert_eq!(lines[1], "bind    BIND        1     1");
        assert_eq!(lines[4], "1       INTEGER     1     10   1");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a\nb"), "a\\nb");
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("\"hi\""), "\"hi\"");
    }
}
