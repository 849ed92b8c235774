//! Analysis request controller
//!
//! Issues analyzer calls for a [`Session`] and routes their outcomes back
//! into it. There is no transport cancellation; a superseded call runs to
//! completion and its outcome is dropped by [`Session::complete`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::analyzer::Analyzer;
use crate::error::AnalysisError;
use crate::session::{Completion, Session};
use crate::surface::EditorSurface;
use crate::token::Token;

/// Run one analysis to completion for the session's current text
pub async fn run(
    session: &mut Session,
    analyzer: &dyn Analyzer,
    surface: &mut dyn EditorSurface,
) -> Completion {
    let ticket = session.begin_run();
    let outcome = analyzer.analyze(&ticket.request).await;
    session.complete(ticket.seq, outcome, surface)
}

/// Outcome of a dispatched run, delivered back to the event loop
#[derive(Debug)]
pub struct AnalysisResponse {
    pub seq: u64,
    pub outcome: Result<Vec<Token>, AnalysisError>,
}

impl AnalysisResponse {
    /// Hand the outcome to the session that issued it
    pub fn apply(self, session: &mut Session, surface: &mut dyn EditorSurface) -> Completion {
        session.complete(self.seq, self.outcome, surface)
    }
}

/// Spawns analyzer calls without blocking the event loop
pub struct RequestController {
    analyzer: Arc<dyn Analyzer>,
    runtime: Handle,
    responses: mpsc::UnboundedSender<AnalysisResponse>,
}

impl RequestController {
    /// Create a controller and the receiver its responses arrive on
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<AnalysisResponse>) {
        let (responses, rx) = mpsc::unbounded_channel();
        (
            Self {
                analyzer,
                runtime,
                responses,
            },
            rx,
        )
    }

    /// Issue a run for the session's current text and return its sequence number
    ///
    /// The spawned task never touches the session; it only sends the
    /// outcome back through the channel.
    pub fn dispatch(&self, session: &mut Session) -> u64 {
        let ticket = session.begin_run();
        let seq = ticket.seq;
        let analyzer = Arc::clone(&self.analyzer);
        let responses = self.responses.clone();

        self.runtime.spawn(async move {
            let outcome = analyzer.analyze(&ticket.request).await;
            // the receiver is gone once the view closed
            let _ = responses.send(AnalysisResponse { seq, outcome });
        });

        seq
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;
    use crate::analyzer::{interpret_response, AnalyzeRequest};
    use crate::session::RequestState;
    use crate::surface::testing::RecordingSurface;
    use crate::syntax::StyleCategory;

    type Outcome = Result<Vec<Token>, AnalysisError>;

    /// Replies with a canned status and body, like the HTTP analyzer would
    struct CannedAnalyzer {
        status: u16,
        body: String,
        calls: Mutex<Vec<AnalyzeRequest>>,
    }

    impl CannedAnalyzer {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Analyzer for CannedAnalyzer {
        async fn analyze(&self, request: &AnalyzeRequest) -> Outcome {
            self.calls.lock().unwrap().push(request.clone());
            interpret_response(self.status, &self.body)
        }
    }

    /// Holds each request until the test releases it, keyed by source text
    #[derive(Default)]
    struct GatedAnalyzer {
        gates: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
    }

    impl GatedAnalyzer {
        fn gate(&self, code: &str) -> oneshot::Sender<Outcome> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(code.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl Analyzer for GatedAnalyzer {
        async fn analyze(&self, request: &AnalyzeRequest) -> Outcome {
            let gate = self.gates.lock().unwrap().remove(&request.code);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(AnalysisError::Network("gate dropped".into()))),
                None => Err(AnalysisError::Network("no gate".into())),
            }
        }
    }

    const SCENARIO_BODY: &str = r#"{"tokens":[
        {"lexeme":"bind","type":"BIND","line":1,"column":1},
        {"lexeme":"x","type":"IDENTIFIER","line":1,"column":6},
        {"lexeme":"=","type":"ASSIGN","line":1,"column":8},
        {"lexeme":"1","type":"INTEGER","line":1,"column":10,"value":"1"},
        {"lexeme":"\n","type":"NEWLINE","line":2,"column":1}
    ]}"#;

    #[tokio::test]
    async fn test_run_applies_tokens() {
        let analyzer = CannedAnalyzer::new(200, SCENARIO_BODY);
        let mut surface = RecordingSurface::default();
        let mut session = Session::new("bind x = 1\n");

        let completion = run(&mut session, &analyzer, &mut surface).await;
        assert_eq!(completion, Completion::Applied { seq: 1, rows: 4 });
        assert_eq!(analyzer.calls.lock().unwrap().len(), 1);

        let categories: Vec<_> = surface.decorations().iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![
                StyleCategory::Keyword,
                StyleCategory::Identifier,
                StyleCategory::Operator,
                StyleCategory::Number,
            ]
        );
        assert_eq!(session.rows()[3].value, "1");
    }

    #[tokio::test]
    async fn test_server_error_keeps_previous_render() {
        let mut surface = RecordingSurface::default();
        let mut session = Session::new("bind x = 1\n");
        run(&mut session, &CannedAnalyzer::new(200, SCENARIO_BODY), &mut surface).await;
        let rows_before = session.rows().to_vec();
        let live_before = surface.decorations();

        session.set_text("bind x = = 1\n");
        let failing = CannedAnalyzer::new(400, r#"{"error":"unexpected token"}"#);
        let completion = run(&mut session, &failing, &mut surface).await;

        assert_eq!(
            completion,
            Completion::Failed {
                seq: 2,
                error: AnalysisError::Server("unexpected token".into())
            }
        );
        assert_eq!(session.state(), &RequestState::Failed("unexpected token".into(), 2));
        assert_eq!(session.error(), Some("unexpected token"));
        assert_eq!(session.rows(), rows_before.as_slice());
        assert_eq!(surface.decorations(), live_before);
        // no retry on failure
        assert_eq!(failing.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_late_response_of_superseded_run_is_inert() {
        let analyzer = Arc::new(GatedAnalyzer::default());
        let (controller, mut rx) = RequestController::new(analyzer.clone(), Handle::current());
        let mut surface = RecordingSurface::default();
        let mut session = Session::new("warmup");

        for _ in 0..4 {
            let ticket = session.begin_run();
            session.complete(ticket.seq, Ok(vec![]), &mut surface);
        }

        let slow = analyzer.gate("slow");
        let fast = analyzer.gate("fast");

        session.set_text("slow");
        assert_eq!(controller.dispatch(&mut session), 5);
        session.set_text("fast");
        assert_eq!(controller.dispatch(&mut session), 6);
        assert_eq!(session.in_flight(), 2);

        fast.send(interpret_response(200, SCENARIO_BODY)).unwrap();
        let response = rx.recv().await.unwrap();
        assert_eq!(response.seq, 6);
        assert_eq!(
            response.apply(&mut session, &mut surface),
            Completion::Applied { seq: 6, rows: 4 }
        );
        let calls = surface.replace_calls;

        slow.send(Ok(vec![Token::new("STRING", "\"stale\"", 1, 1)])).unwrap();
        let response = rx.recv().await.unwrap();
        assert_eq!(response.seq, 5);
        assert_eq!(
            response.apply(&mut session, &mut surface),
            Completion::Discarded { seq: 5 }
        );

        assert!(matches!(session.state(), RequestState::Succeeded(_, 6)));
        assert_eq!(session.rows().len(), 4);
        assert_eq!(surface.replace_calls, calls);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_dispatch_sends_current_text() {
        let analyzer = Arc::new(CannedAnalyzer::new(200, r#"{"tokens":[]}"#));
        let (controller, mut rx) = RequestController::new(analyzer.clone(), Handle::current());
        let mut session = Session::new("const PI =: 3.14;");

        let seq = controller.dispatch(&mut session);
        let response = rx.recv().await.unwrap();
        assert_eq!(response.seq, seq);
        assert_eq!(analyzer.calls.lock().unwrap()[0].code, "const PI =: 3.14;");
    }
}
