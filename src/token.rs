//! Token records as delivered by the analyzer
//!
//! Tokens are untrusted: any field may be missing or out of range. They are
//! kept exactly as received; the pipelines in [`crate::syntax`] decide what
//! is displayable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A single token from the analyzer response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Token {
    /// Source text the token covers (may be empty)
    #[serde(default, deserialize_with = "lenient")]
    pub lexeme: String,
    /// Type tag such as `IDENTIFIER` or `BIND_ASSIGN`
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: String,
    /// 1-based line; non-positive values mark malformed entries
    #[serde(default, deserialize_with = "lenient")]
    pub line: i64,
    /// 1-based column
    #[serde(default, deserialize_with = "lenient")]
    pub column: i64,
    /// Decoded literal value
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Opaque analyzer payload, carried but never inspected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

/// Decode a field, falling back to its default when it is null or mistyped
///
/// A bad field only spoils its own token, which the display filter then
/// drops; the rest of the response still decodes.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

impl Token {
    /// Create a token with no value or extra payload
    pub fn new(kind: impl Into<String>, lexeme: impl Into<String>, line: i64, column: i64) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind: kind.into(),
            line,
            column,
            value: None,
            extra: None,
        }
    }

    /// Builder: attach a decoded literal value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Lexeme length in characters
    pub fn char_len(&self) -> usize {
        self.lexeme.chars().count()
    }
}
