//! Displayability filter shared by the decoration and table pipelines

use crate::token::Token;

/// Check whether a token should appear in either view
///
/// Rejects empty lexemes, non-positive lines, `NEWLINE` tokens in any case,
/// and lexemes that are a bare newline or its escaped `\n` spelling.
pub fn is_displayable(token: &Token) -> bool {
    if token.lexeme.is_empty() || token.line <= 0 {
        return false;
    }
    if token.kind.eq_ignore_ascii_case("NEWLINE") {
        return false;
    }
    !matches!(token.lexeme.as_str(), "\n" | "\\n")
}

/// Iterate over the displayable tokens, preserving order
pub fn displayable(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens.iter().filter(|t| is_displayable(t))
}
