//! Token coordinates to display ranges

use crate::token::Token;

/// A single-line range in 1-based editor coordinates
///
/// `end_column` is exclusive. Ranges produced by [`map_range`] always have
/// `start_line == end_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayRange {
    pub start_line: i64,
    pub start_column: i64,
    pub end_line: i64,
    pub end_column: i64,
}

impl DisplayRange {
    /// Create a new range
    pub fn new(start_line: i64, start_column: i64, end_line: i64, end_column: i64) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// Convert a token position into the range it should highlight
///
/// The span is the lexeme length in characters, never less than one. A
/// lexeme that crosses line breaks is still mapped onto its first line.
pub fn map_range(token: &Token) -> DisplayRange {
    let start_column = token.column.max(1);
    let span = (token.char_len() as i64).max(1);
    DisplayRange::new(token.line, start_column, token.line, start_column.saturating_add(span))
}
