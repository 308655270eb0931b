//! Raw mode and alternate screen, restored on drop

use std::io::{self, Write};

use anyhow::{Context, Result as AnyhowResult};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Terminal state owned for the lifetime of the editor
#[derive(Debug)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
}

impl TerminalModes {
    /// Switch the terminal into raw mode on the alternate screen
    pub fn enable() -> AnyhowResult<Self> {
        let mut modes = Self {
            raw_mode: false,
            alternate_screen: false,
        };

        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        modes.raw_mode = true;

        execute!(io::stdout(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        modes.alternate_screen = true;

        tracing::debug!("Terminal modes enabled");
        Ok(modes)
    }

    /// Undo whatever `enable` managed to set up
    pub fn restore(&mut self) {
        let mut stdout = io::stdout();
        if self.alternate_screen {
            if let Err(e) = execute!(stdout, Show, LeaveAlternateScreen) {
                tracing::warn!("Failed to leave alternate screen: {}", e);
            }
            self.alternate_screen = false;
        }
        if self.raw_mode {
            if let Err(e) = terminal::disable_raw_mode() {
                tracing::warn!("Failed to disable raw mode: {}", e);
            }
            self.raw_mode = false;
        }
        let _ = stdout.flush();
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Best-effort restore for the panic hook, where the guard may not get to run
pub fn emergency_cleanup() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}
