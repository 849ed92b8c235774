//! Interactive event loop
//!
//! Owns the session and the terminal editor on the UI thread. Analyzer
//! calls run on the tokio runtime and their responses are drained here
//! between key presses.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::controller::{AnalysisResponse, RequestController};
use crate::display::{Display, Layout};
use crate::editor::TerminalEditor;
use crate::error::Result;
use crate::input::{InputState, Key};
use crate::session::{Completion, Session};
use crate::surface::{EditorSurface, SurfaceEvent};
use crate::terminal::Terminal;

/// How long to wait for a key before checking for responses again
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The interactive token view
pub struct App {
    terminal: Terminal,
    display: Display,
    editor: TerminalEditor,
    input: InputState,
    session: Session,
    controller: RequestController,
    responses: mpsc::UnboundedReceiver<AnalysisResponse>,
    running: bool,
}

impl App {
    pub fn new(
        terminal: Terminal,
        display: Display,
        editor: TerminalEditor,
        session: Session,
        controller: RequestController,
        responses: mpsc::UnboundedReceiver<AnalysisResponse>,
    ) -> Self {
        Self {
            terminal,
            display,
            editor,
            input: InputState::new(),
            session,
            controller,
            responses,
            running: true,
        }
    }

    /// Run until the user quits
    pub fn run(&mut self) -> Result<()> {
        info!(file = ?self.session.filename(), "view opened");
        self.display.force_redraw();

        while self.running {
            self.drain_responses();
            self.fit_window();
            self.display.render(&mut self.terminal, &self.editor, &self.session)?;

            if !self.terminal.poll_event(POLL_INTERVAL)? {
                continue;
            }
            match self.terminal.read_event()? {
                Some(key_event) => {
                    if let Some(key) = self.input.translate_key(key_event) {
                        self.handle_key(key);
                    }
                }
                None => self.display.force_redraw(),
            }
        }

        info!(issued = self.session.sequence(), "view closed");
        Ok(())
    }

    /// Apply every response that has arrived so far
    fn drain_responses(&mut self) {
        loop {
            match self.responses.try_recv() {
                Ok(response) => {
                    if let Completion::Discarded { seq } =
                        response.apply(&mut self.session, &mut self.editor)
                    {
                        debug!(seq, "stale response dropped");
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn fit_window(&mut self) {
        let layout = Layout::for_rows(self.terminal.rows());
        if self.editor.window().height() != layout.editor_rows {
            self.editor.window_mut().set_height(layout.editor_rows);
        }
    }

    fn handle_key(&mut self, key: Key) {
        match self.editor.handle_key(key, self.session.rows().len()) {
            Some(SurfaceEvent::Edited) => self.session.set_text(self.editor.text()),
            Some(SurfaceEvent::Trigger) => {
                if self.session.is_running() {
                    debug!(seq = self.session.sequence(), "run already pending");
                } else {
                    self.controller.dispatch(&mut self.session);
                }
            }
            Some(SurfaceEvent::Quit) => self.running = false,
            None => {}
        }
    }
}
