//! Input handling for the TUI.
//!
//! This module translates keyboard events into application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions that can be performed based on user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Quit the application
    Quit,
    /// Pause or resume polling
    ToggleLive,
    /// Advance the chart-type selector
    CycleChartKind,
    /// Toggle help panel
    ToggleHelp,
    /// No action
    None,
}

/// Map a key event to an application action
pub fn map_key_to_action(key_event: KeyEvent) -> InputAction {
    // Release/repeat events arrive on some platforms; act on presses only
    if key_event.kind != KeyEventKind::Press {
        return InputAction::None;
    }

    match key_event.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
        KeyCode::Esc => InputAction::Quit,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::Quit
        }

        // Pause / resume
        KeyCode::Char(' ') => InputAction::ToggleLive,
        KeyCode::Char('p') | KeyCode::Char('P') => InputAction::ToggleLive,

        // Chart type
        KeyCode::Char('t') | KeyCode::Char('T') => InputAction::CycleChartKind,

        // Help
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
            InputAction::ToggleHelp
        }

        _ => InputAction::None,
    }
}
