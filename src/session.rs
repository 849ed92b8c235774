//! Per-view session state
//!
//! A [`Session`] is the only mutable state of the core. It is owned by the
//! view's event loop and passed by `&mut` into every operation; nothing in
//! it is shared across threads.

use tracing::{debug, warn};

use crate::analyzer::AnalyzeRequest;
use crate::decoration::{self, DecorationHandle};
use crate::error::AnalysisError;
use crate::surface::EditorSurface;
use crate::table::{self, TableRow};
use crate::token::Token;

/// Lifecycle of the most recent analysis request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Running(u64),
    Succeeded(Vec<Token>, u64),
    Failed(String, u64),
}

impl RequestState {
    /// Sequence number of the request this state belongs to
    pub fn sequence(&self) -> Option<u64> {
        match self {
            RequestState::Idle => None,
            RequestState::Running(seq)
            | RequestState::Succeeded(_, seq)
            | RequestState::Failed(_, seq) => Some(*seq),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RequestState::Running(_))
    }
}

/// An issued run, to be completed with the analyzer's outcome
#[derive(Debug, Clone)]
pub struct Ticket {
    pub seq: u64,
    pub request: AnalyzeRequest,
}

/// What completing a run did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Tokens were accepted and both views were refreshed
    Applied { seq: u64, rows: usize },
    /// The failure was accepted; views kept their previous content
    Failed { seq: u64, error: AnalysisError },
    /// A newer run was issued meanwhile; nothing changed
    Discarded { seq: u64 },
}

/// Aggregate state of one editor view
#[derive(Debug, Default)]
pub struct Session {
    /// Current source text, mirrored from the editor surface
    text: String,
    /// File name sent along with analysis requests
    filename: Option<String>,
    state: RequestState,
    /// Handles of the decorations currently installed on the surface
    handles: Vec<DecorationHandle>,
    /// Inspector rows for the last accepted success
    rows: Vec<TableRow>,
    /// Message of the last accepted failure, cleared on success
    error: Option<String>,
    /// Highest sequence number issued so far
    seq: u64,
    /// Runs issued whose response has not arrived yet
    in_flight: usize,
}

impl Session {
    /// Create a session for a freshly mounted view
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder: name the file being viewed
    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Record an edit made on the surface
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Highest sequence number issued so far
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Whether any issued run still awaits its response
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Latest accepted failure message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn decoration_handles(&self) -> &[DecorationHandle] {
        &self.handles
    }

    /// Issue a new run for the current text
    ///
    /// Allowed while another run is pending; the older one is superseded.
    pub fn begin_run(&mut self) -> Ticket {
        self.seq += 1;
        self.in_flight += 1;
        self.state = RequestState::Running(self.seq);
        debug!(seq = self.seq, bytes = self.text.len(), "analysis issued");

        Ticket {
            seq: self.seq,
            request: AnalyzeRequest::new(self.text.clone()).with_filename(self.filename.clone()),
        }
    }

    /// Deliver the outcome of run `seq`
    ///
    /// Outcomes of superseded runs only settle the in-flight count. An
    /// accepted failure keeps the previous decorations and rows.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<Vec<Token>, AnalysisError>,
        surface: &mut dyn EditorSurface,
    ) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);

        if seq != self.seq {
            debug!(seq, current = self.seq, "discarding superseded analysis");
            return Completion::Discarded { seq };
        }

        match outcome {
            Ok(tokens) => {
                self.handles = decoration::sync(surface, &tokens, &self.handles);
                self.rows = table::project(&tokens);
                self.error = None;
                debug!(seq, tokens = tokens.len(), rows = self.rows.len(), "analysis applied");
                self.state = RequestState::Succeeded(tokens, seq);
                Completion::Applied {
                    seq,
                    rows: self.rows.len(),
                }
            }
            Err(err) => {
                let message = err.message().to_string();
                warn!(seq, kind = err.kind(), %message, "analysis failed");
                self.error = Some(message.clone());
                self.state = RequestState::Failed(message, seq);
                Completion::Failed { seq, error: err }
            }
        }
    }
}
