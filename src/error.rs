//! Error types for synta-view

use thiserror::Error;

/// Result type alias for application-level operations
pub type Result<T> = std::result::Result<T, ViewError>;

/// Default message when the analyzer gives no reason for a failure
pub const DEFAULT_FAILURE_MESSAGE: &str = "analysis failed";

/// Failure of a single analysis request
///
/// The variants only matter for logging; everything above the request
/// controller sees the collapsed [`AnalysisError::message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Transport-level failure reaching the analyzer
    #[error("{0}")]
    Network(String),

    /// Non-2xx status or an explicit `error` field
    #[error("{0}")]
    Server(String),

    /// Missing or undecodable `tokens` field
    #[error("{0}")]
    MalformedResponse(String),
}

impl AnalysisError {
    /// The user-facing message, regardless of the failure kind
    pub fn message(&self) -> &str {
        match self {
            AnalysisError::Network(msg)
            | AnalysisError::Server(msg)
            | AnalysisError::MalformedResponse(msg) => msg,
        }
    }

    /// Short label for log output
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Network(_) => "network",
            AnalysisError::Server(_) => "server",
            AnalysisError::MalformedResponse(_) => "malformed-response",
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    Message(String),
}
