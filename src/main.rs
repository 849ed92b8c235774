//! synta-view - token highlighting view over a remote analyzer

use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use synta_view::analyzer::HttpAnalyzer;
use synta_view::app::App;
use synta_view::buffer::Buffer;
use synta_view::config::Config;
use synta_view::controller::{self, RequestController};
use synta_view::display::Display;
use synta_view::editor::TerminalEditor;
use synta_view::error::{Result, ViewError};
use synta_view::session::{Completion, Session};
use synta_view::surface::EditorSurface;
use synta_view::table::render_table;
use synta_view::terminal::Terminal;

#[derive(Parser, Debug)]
#[command(name = "synta-view")]
#[command(about = "Highlight source text with tokens from a remote analyzer")]
#[command(version)]
struct Args {
    /// File to view (opens a scratch buffer if omitted)
    file: Option<PathBuf>,

    /// Analyzer URL, overriding the configuration file
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Configuration file to use instead of ~/.synta-view.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Analyze once and print the token table to stdout (reads stdin without FILE)
    #[arg(short, long)]
    table: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }

    setup_tracing(&config, args.table, args.verbose);
    tracing::debug!(?config, "configuration loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let analyzer = Arc::new(HttpAnalyzer::new(config.endpoint.clone(), config.timeout));
    tracing::info!(endpoint = analyzer.endpoint(), timeout = ?config.timeout, "analyzer configured");

    if args.table {
        return print_table(&runtime, analyzer.as_ref(), args.file);
    }

    let mut editor = match &args.file {
        Some(path) => TerminalEditor::open(path)?,
        None => TerminalEditor::scratch(),
    };
    editor.bind_trigger(config.trigger);
    let session = Session::new(editor.text()).with_filename(file_name(&args.file));

    let (controller, responses) = RequestController::new(analyzer, runtime.handle().clone());
    let display = Display::new(config.show_line_numbers, config.tab_width, config.trigger);

    let terminal = Terminal::new()?;
    App::new(terminal, display, editor, session, controller, responses).run()
}

/// One-shot mode: analyze FILE or stdin and print the table
fn print_table(
    runtime: &tokio::runtime::Runtime,
    analyzer: &HttpAnalyzer,
    file: Option<PathBuf>,
) -> Result<()> {
    let mut editor = match &file {
        Some(path) => TerminalEditor::open(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            TerminalEditor::new(Buffer::new("*stdin*", &text))
        }
    };
    let mut session = Session::new(editor.text()).with_filename(file_name(&file));

    match runtime.block_on(controller::run(&mut session, analyzer, &mut editor)) {
        Completion::Applied { .. } => {
            print!("{}", render_table(session.rows()));
            Ok(())
        }
        Completion::Failed { error, .. } => Err(ViewError::Analysis(error)),
        Completion::Discarded { seq } => {
            Err(ViewError::Message(format!("analysis {} was superseded", seq)))
        }
    }
}

fn file_name(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
}

/// Route tracing to the configured log file, or to stderr in table mode
///
/// The interactive view owns the terminal, so without a log file nothing
/// is recorded there.
fn setup_tracing(config: &Config, table_mode: bool, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("synta_view=debug,info")
        } else {
            EnvFilter::new(&config.log_level)
        }
    });

    if let Some(path) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false)
                    .with_target(true);
                tracing_subscriber::registry().with(filter).with(file_layer).init();
                tracing::info!(path = ?path, "tracing initialized");
                return;
            }
            Err(e) if table_mode => eprintln!("cannot open log file {}: {}", path.display(), e),
            Err(_) => return,
        }
    }

    if table_mode {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}
