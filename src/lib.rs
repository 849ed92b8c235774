//! synta-view - highlight source text with tokens from a remote analyzer
//!
//! The core is independent of any particular editor widget: it talks to
//! one through [`EditorSurface`] and to the analyzer through [`Analyzer`].
//! The terminal modules provide the interactive front end.

pub mod analyzer;
pub mod app;
pub mod buffer;
pub mod config;
pub mod controller;
pub mod decoration;
pub mod display;
pub mod editor;
pub mod error;
pub mod input;
pub mod line;
pub mod session;
pub mod surface;
pub mod syntax;
pub mod table;
pub mod terminal;
pub mod token;
pub mod window;

pub use analyzer::{Analyzer, AnalyzeRequest, HttpAnalyzer};
pub use controller::{AnalysisResponse, RequestController};
pub use decoration::{Decoration, DecorationHandle};
pub use error::{AnalysisError, Result, ViewError};
pub use session::{Completion, RequestState, Session};
pub use surface::{EditorSurface, KeyChord, SurfaceEvent};
pub use table::TableRow;
pub use token::Token;
