use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{poll as event_poll, read as event_read, Event as CrosstermEvent};
use quill::{
    config::Config,
    editor::Editor,
    input::key::Key,
    input::key_translator,
    services::terminal_modes::{self, TerminalModes},
    services::tracing_setup,
};
use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

/// How long to wait for a key before redrawing anyway
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// A small terminal text editor
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "A small terminal text editor with syntax highlighting", long_about = None)]
#[command(version)]
struct Args {
    /// File to open; created on first save if it doesn't exist
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for editor diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(tracing_setup::default_log_path);
    if let Err(e) = tracing_setup::init_global(&log_file) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    tracing::info!("Editor starting");

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(),
    };

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let (width, height) = crossterm::terminal::size().context("Failed to get terminal size")?;
    let mut editor = Editor::new(&config.editor, width, height);
    if let Some(path) = &args.file {
        editor.open(path);
    }

    let mut terminal_modes = TerminalModes::enable()?;
    let result = run_event_loop(&mut editor);
    terminal_modes.restore();

    match &result {
        Ok(()) => tracing::info!("Editor exiting"),
        Err(e) => tracing::error!("Editor exited with error: {e:#}"),
    }
    result
}

/// Draw, wait for a key, dispatch it; until the editor asks to quit
fn run_event_loop(editor: &mut Editor) -> AnyhowResult<()> {
    let mut stdout = io::stdout();
    loop {
        let frame = editor.render()?;
        stdout.write_all(&frame).context("Failed to write frame")?;
        stdout.flush().context("Failed to flush frame")?;

        let key = poll_key(editor)?;
        if !editor.process_key(key) {
            return Ok(());
        }
    }
}

fn poll_key(editor: &mut Editor) -> AnyhowResult<Key> {
    if !event_poll(POLL_TIMEOUT)? {
        return Ok(Key::None);
    }
    Ok(match event_read()? {
        CrosstermEvent::Key(event) => key_translator::translate(event),
        CrosstermEvent::Resize(width, height) => {
            editor.resize(width, height);
            Key::None
        }
        _ => Key::None,
    })
}
