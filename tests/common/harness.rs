// EditorTestHarness - Virtual terminal environment for E2E testing

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quill::config::{Config, EditorConfig};
use quill::editor::Editor;
use quill::input::key::Key;
use quill::input::key_translator;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Terminal layout constants
/// Text rows fill the screen except for the two bars at the bottom
pub mod layout {
    /// Get the status bar row for a given terminal height
    #[inline]
    pub const fn status_bar_row(terminal_height: u16) -> u16 {
        terminal_height - 2
    }

    /// Get the message line row for a given terminal height
    #[inline]
    pub const fn message_line_row(terminal_height: u16) -> u16 {
        terminal_height - 1
    }
}

/// Virtual editor environment for testing
/// Frames are fed to a vt100 parser, which plays the part of the real terminal
pub struct EditorTestHarness {
    /// The editor instance
    editor: Editor,

    /// VT100 parser interpreting the ANSI output
    vt100_parser: vt100::Parser,

    /// Temp directory for files created by the test
    temp_dir: TempDir,

    /// Whether the last key asked the editor to quit
    quit: bool,

    term_width: u16,
    term_height: u16,
}

impl EditorTestHarness {
    /// Create new test harness with default configuration
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(width, height, Config::default())
    }

    /// Create new test harness with custom config
    pub fn with_config(width: u16, height: u16, config: Config) -> Self {
        Self::with_editor_config(width, height, &config.editor)
    }

    pub fn with_editor_config(width: u16, height: u16, config: &EditorConfig) -> Self {
        Self {
            editor: Editor::new(config, width, height),
            vt100_parser: vt100::Parser::new(height, width, 0),
            temp_dir: TempDir::new().unwrap(),
            quit: false,
            term_width: width,
            term_height: height,
        }
    }

    /// Path inside the harness's temp directory
    pub fn temp_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write `content` to a temp file and open it
    pub fn open_with_content(&mut self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path(name);
        std::fs::write(&path, content).unwrap();
        self.open_file(&path);
        path
    }

    pub fn open_file(&mut self, path: &Path) {
        self.editor.open(path);
    }

    /// Send an abstract key
    pub fn send(&mut self, key: Key) {
        assert!(!self.quit, "key sent after the editor quit");
        self.quit = !self.editor.process_key(key);
    }

    /// Send a key the way the terminal would report it
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.send(key_translator::translate(KeyEvent::new(code, modifiers)));
    }

    pub fn send_key_repeat(&mut self, code: KeyCode, modifiers: KeyModifiers, count: usize) {
        for _ in 0..count {
            self.send_key(code, modifiers);
        }
    }

    pub fn ctrl(&mut self, c: char) {
        self.send_key(KeyCode::Char(c), KeyModifiers::CONTROL);
    }

    /// Type text; `\n` becomes Enter
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.send_key(KeyCode::Enter, KeyModifiers::NONE);
            } else {
                self.send_key(KeyCode::Char(c), KeyModifiers::NONE);
            }
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.editor.resize(width, height);
        self.vt100_parser = vt100::Parser::new(height, width, 0);
        self.term_width = width;
        self.term_height = height;
    }

    /// Render a frame and feed it to the virtual terminal
    pub fn render(&mut self) {
        let frame = self.editor.render().unwrap();
        self.vt100_parser.process(&frame);
    }

    /// Raw bytes of the next frame, without feeding the virtual terminal
    pub fn render_bytes(&mut self) -> Vec<u8> {
        self.editor.render().unwrap()
    }

    /// Get the screen content as parsed by vt100
    pub fn screen_to_string(&self) -> String {
        (0..self.term_height)
            .map(|row| self.get_row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the text content of a specific screen row
    pub fn get_row_text(&self, row: u16) -> String {
        let screen = self.vt100_parser.screen();
        let mut text = String::new();
        for col in 0..self.term_width {
            match screen.cell(row, col) {
                Some(cell) if !cell.contents().is_empty() => text.push_str(&cell.contents()),
                _ => text.push(' '),
            }
        }
        text
    }

    /// Foreground colour of a cell
    pub fn cell_fg(&self, col: u16, row: u16) -> vt100::Color {
        self.vt100_parser
            .screen()
            .cell(row, col)
            .map(|cell| cell.fgcolor())
            .unwrap_or(vt100::Color::Default)
    }

    pub fn cell_inverse(&self, col: u16, row: u16) -> bool {
        self.vt100_parser
            .screen()
            .cell(row, col)
            .is_some_and(|cell| cell.inverse())
    }

    /// Terminal cursor as (col, row)
    pub fn screen_cursor(&self) -> (u16, u16) {
        let (row, col) = self.vt100_parser.screen().cursor_position();
        (col, row)
    }

    pub fn cursor_hidden(&self) -> bool {
        self.vt100_parser.screen().hide_cursor()
    }

    pub fn status_bar(&self) -> String {
        self.get_row_text(layout::status_bar_row(self.term_height))
    }

    pub fn message_line(&self) -> String {
        self.get_row_text(layout::message_line_row(self.term_height))
    }

    /// Verify text appears on screen
    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Verify text does not appear on screen
    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Document rows joined with `\n`
    pub fn get_buffer_content(&self) -> String {
        self.editor
            .document()
            .rows()
            .iter()
            .map(|row| String::from_utf8_lossy(row.chars()).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Verify buffer content matches expected
    pub fn assert_buffer_content(&self, expected: &str) {
        let actual = self.get_buffer_content();
        assert_eq!(
            actual, expected,
            "Buffer content mismatch\nExpected: {expected:?}\nActual: {actual:?}",
        );
    }

    /// Document cursor as (x, y)
    pub fn cursor(&self) -> (usize, usize) {
        let pos = self.editor.document().cursor();
        (pos.x, pos.y)
    }

    /// Access the editor directly (for advanced testing)
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
