//! Style categories and token classification
//!
//! Every displayable token maps to exactly one [`StyleCategory`]. The
//! mapping is driven by the analyzer's type tag alone, compared
//! case-insensitively.

use super::style::{Color, Style};

/// Highlight classes applied to decorated tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    /// Language keywords, type keywords and `@agent`/`@task` markers
    Keyword,
    /// String literals
    String,
    /// Integer and float literals
    Number,
    /// Line and block comments
    Comment,
    /// Characters the analyzer could not lex
    Illegal,
    /// Arithmetic, comparison and assignment operators
    Operator,
    /// Everything else
    Identifier,
}

/// Type tags rendered as keywords
const KEYWORD_TYPES: &[&str] = &[
    "IF", "ELIF", "ELSE", "WHILE", "MATCH", "RETURN", "AWAIT", "BREAK", "CONTINUE", "BIND",
    "CONST", "CRAFT", "USE", "AS", "FROM", "FN", "STRUCT", "TRY", "CATCH", "RAISE", "TYPE",
    "CAST", "ANY", "NONE", "TRAIT", "INT_TYPE", "FLOAT_TYPE", "CHAR_TYPE", "BOOL_TYPE",
    "STR_TYPE", "ASYNC",
];

/// Agent-construct markers, also rendered as keywords
const MARKER_TYPES: &[&str] = &["AT_AGENT", "AT_TASK"];

const OPERATOR_TYPES: &[&str] = &["PLUS", "MINUS", "ARROW", "EQ", "NEQ"];

/// Map an analyzer type tag to its style category
///
/// Rules are checked in order and the first match wins. Keyword membership
/// is tested before the assignment rule, so a keyword tag ending in
/// `_ASSIGN` stays a keyword. Plain `ASSIGN` counts as an operator.
pub fn classify(kind: &str) -> StyleCategory {
    let kind = kind.to_ascii_uppercase();
    let kind = kind.as_str();

    if KEYWORD_TYPES.contains(&kind) || MARKER_TYPES.contains(&kind) {
        StyleCategory::Keyword
    } else if kind == "STRING" {
        StyleCategory::String
    } else if matches!(kind, "INTEGER" | "FLOAT") {
        StyleCategory::Number
    } else if matches!(kind, "COMMENT_LINE" | "COMMENT_MULTI") {
        StyleCategory::Comment
    } else if kind == "ILLEGAL" {
        StyleCategory::Illegal
    } else if OPERATOR_TYPES.contains(&kind) || kind == "ASSIGN" || kind.ends_with("_ASSIGN") {
        StyleCategory::Operator
    } else {
        StyleCategory::Identifier
    }
}

impl StyleCategory {
    /// Get the default terminal style for this category
    pub fn default_style(&self) -> Style {
        match self {
            StyleCategory::Keyword => Style::fg(Color::Magenta).with_bold(),
            StyleCategory::String => Style::fg(Color::Green),
            StyleCategory::Number => Style::fg(Color::Cyan),
            StyleCategory::Comment => Style::fg(Color::BrightBlack).with_italic(),
            StyleCategory::Illegal => Style::fg(Color::BrightWhite).with_bg(Color::Red).with_underline(),
            StyleCategory::Operator => Style::fg(Color::Yellow),
            StyleCategory::Identifier => Style::fg(Color::BrightBlue),
        }
    }
}
