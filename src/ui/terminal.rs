//! Terminal setup and teardown.

use crate::error::UiError;
use crossterm::{
    cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Owns the ratatui terminal; restores the screen when dropped
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Switch to the alternate screen in raw mode
    pub fn enter() -> Result<Self, UiError> {
        let init = |e: io::Error| UiError::InitializationError(e.to_string());

        terminal::enable_raw_mode().map_err(init)?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen).map_err(init)?;
        stdout.execute(cursor::Hide).map_err(init)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(init)?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, app: &super::App) -> Result<(), UiError> {
        self.terminal
            .draw(|frame| super::draw(frame, app))
            .map(|_| ())
            .map_err(|e| UiError::RenderError(e.to_string()))
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = terminal::disable_raw_mode();
        let stdout = self.terminal.backend_mut();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(cursor::Show);
    }
}
