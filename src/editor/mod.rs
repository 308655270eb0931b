//! The editor session
//!
//! Owns the document, the viewport and the transient UI state (status message,
//! active prompt, incremental find) and turns each key into document commands.
//! Key dispatch lives in `input`, incremental find in `search`.

mod input;
mod search;

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result as AnyhowResult;

use crate::config::EditorConfig;
use crate::model::document::Document;
use crate::services::fs;
use crate::view::prompt::Prompt;
use crate::view::ui::render_frame;
use crate::view::viewport::Viewport;

pub use search::find_match;
use search::SearchState;

/// Shown on the message bar when the editor starts
pub const HELP_MESSAGE: &str =
    "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find | Ctrl-Z = undo | Ctrl-Y = redo";

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// One editing session over a single document
#[derive(Debug)]
pub struct Editor {
    document: Document,
    viewport: Viewport,
    config: EditorConfig,
    status: Option<StatusMessage>,
    prompt: Option<Prompt>,
    search: Option<SearchState>,
    /// Ctrl-Q presses still needed to quit with unsaved changes
    quit_times: u32,
}

impl Editor {
    /// Create a session with an empty document for a terminal of the given size
    pub fn new(config: &EditorConfig, width: u16, height: u16) -> Self {
        let mut editor = Self {
            document: Document::new(config.tab_stop, config.undo_limit),
            viewport: Viewport::new(width, height, config.line_numbers),
            config: config.clone(),
            status: None,
            prompt: None,
            search: None,
            quit_times: config.quit_confirm_times,
        };
        editor.set_status(HELP_MESSAGE);
        editor
    }

    /// Load `path` into the document. A file that can't be read leaves the
    /// document empty, with the syntax rule still chosen from the name.
    pub fn open(&mut self, path: &Path) {
        self.document.set_filename(path);
        match fs::read_file(path) {
            Ok(Some(bytes)) => {
                self.document.load(&bytes);
                tracing::info!(
                    "Opened {} ({} rows)",
                    path.display(),
                    self.document.row_count()
                );
            }
            Ok(None) => tracing::info!("New file {}", path.display()),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                self.set_status(format!("Can't open {}: {}", path.display(), e));
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    /// The status message, unless it has expired
    pub fn status_message(&self) -> Option<&str> {
        let timeout = Duration::from_secs(self.config.message_timeout_secs);
        self.status
            .as_ref()
            .filter(|s| s.set_at.elapsed() < timeout)
            .map(|s| s.text.as_str())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!("Resize to {}x{}", width, height);
        self.viewport.resize(width, height);
    }

    /// Scroll the cursor into view and compose the next frame
    pub fn render(&mut self) -> AnyhowResult<Vec<u8>> {
        self.viewport.scroll(&self.document);
        let prompt_line = self.prompt.as_ref().map(Prompt::display);
        let message = prompt_line.as_deref().or_else(|| self.status_message());
        render_frame(&self.document, &self.viewport, message)
    }

    /// Save to the current filename, or ask for one
    fn save(&mut self) {
        match self.document.filename().map(Path::to_path_buf) {
            Some(path) => self.write_to(&path),
            None => self.prompt = Some(Prompt::save_as()),
        }
    }

    fn write_to(&mut self, path: &Path) {
        let bytes = self.document.serialize();
        match fs::write_atomic(path, &bytes) {
            Ok(()) => {
                self.document.mark_clean();
                tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());
                self.set_status(format!("{} bytes written to disk", bytes.len()));
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", path.display(), e);
                self.set_status(format!("Can't save! I/O error: {e}"));
            }
        }
    }
}
