//! Client for the lexical analyzer service
//!
//! The analyzer is reached over HTTP with a JSON body `{"code": ...}`. Its
//! reply either carries a `tokens` array or an `error` string; an `error`
//! string wins even on a 2xx status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, DEFAULT_FAILURE_MESSAGE};
use crate::token::Token;

/// Source of token streams
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze one source text; exactly one attempt, no retries
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Token>, AnalysisError>;
}

/// Request body sent to the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            filename: None,
        }
    }

    /// Builder: name the file the code came from
    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    tokens: Option<Vec<Token>>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret an analyzer reply from its status code and raw body
pub fn interpret_response(status: u16, body: &str) -> Result<Vec<Token>, AnalysisError> {
    let ok = (200..300).contains(&status);
    let parsed: Option<AnalyzeResponse> = serde_json::from_str(body).ok();

    let error = parsed
        .as_ref()
        .and_then(|r| r.error.as_deref())
        .filter(|e| !e.is_empty());
    if let Some(message) = error {
        return Err(AnalysisError::Server(message.to_string()));
    }
    if !ok {
        return Err(AnalysisError::Server(DEFAULT_FAILURE_MESSAGE.to_string()));
    }

    match parsed {
        Some(AnalyzeResponse {
            tokens: Some(tokens),
            ..
        }) => Ok(tokens),
        Some(_) => Err(AnalysisError::MalformedResponse(format!(
            "{DEFAULT_FAILURE_MESSAGE}: response has no tokens"
        ))),
        None => Err(AnalysisError::MalformedResponse(format!(
            "{DEFAULT_FAILURE_MESSAGE}: invalid response body"
        ))),
    }
}

/// Analyzer reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpAnalyzer {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAnalyzer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Vec<Token>, AnalysisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;
        debug!(status, bytes = body.len(), "analyzer replied");

        interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let body = r#"{"tokens":[{"lexeme":"bind","type":"BIND","line":1,"column":1}]}"#;
        let tokens = interpret_response(200, body).unwrap();
        assert_eq!(tokens, vec![Token::new("BIND", "bind", 1, 1)]);
    }

    #[test]
    fn test_null_field_spoils_only_its_token() {
        let body = r#"{"tokens":[
            {"lexeme":"bind","type":"BIND","line":1,"column":1},
            {"lexeme":null,"type":"EOF","line":2,"column":1}
        ]}"#;
        let tokens = interpret_response(200, body).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].lexeme, "");
        assert_eq!(crate::table::project(&tokens).len(), 1);
    }

    #[test]
    fn test_empty_token_list_is_success() {
        assert_eq!(interpret_response(200, r#"{"tokens":[]}"#), Ok(vec![]));
    }

    #[test]
    fn test_error_field_with_bad_status() {
        let err = interpret_response(400, r#"{"error":"unexpected token"}"#).unwrap_err();
        assert_eq!(err, AnalysisError::Server("unexpected token".into()));
        assert_eq!(err.message(), "unexpected token");
    }

    #[test]
    fn test_error_field_wins_on_success_status() {
        let body = r#"{"tokens":[],"error":"invalid json"}"#;
        assert_eq!(interpret_response(200, body).unwrap_err().message(), "invalid json");
    }

    #[test]
    fn test_bad_status_without_message() {
        assert_eq!(interpret_response(500, "oops").unwrap_err().message(), "analysis failed");
        assert_eq!(interpret_response(405, r#"{"error":""}"#).unwrap_err().message(), "analysis failed");
    }

    #[test]
    fn test_malformed_success_body() {
        assert!(matches!(
            interpret_response(200, "not json"),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret_response(200, r#"{"result":[]}"#),
            Err(AnalysisError::MalformedResponse(_))
        ));
        assert!(matches!(
            interpret_response(200, r#"{"tokens":"nope"}"#),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(AnalyzeRequest::new("bind x")).unwrap();
        assert_eq!(body, serde_json::json!({"code": "bind x"}));

        let body = serde_json::to_value(
            AnalyzeRequest::new("bind x").with_filename(Some("main.syn".into())),
        )
        .unwrap();
        assert_eq!(body, serde_json::json!({"code": "bind x", "filename": "main.syn"}));
    }
}
