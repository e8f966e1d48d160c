//! TUI event handling
//!
//! Handles keyboard input using crossterm and dispatches actions to the application.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::app::{ActivePane, App, AppAction, InputMode};
use super::dialogs::DialogResponse;

/// Event handler for TUI input
pub struct EventHandler {
    /// Tick rate for polling events
    tick_rate: Duration,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Poll for next event
    ///
    /// Returns Some(Event) if an event occurred, None if tick timeout elapsed.
    pub fn poll(&self) -> Result<Option<Event>> {
        if event::poll(self.tick_rate)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Handle a key event and return the resulting action
    pub fn handle_key(&self, app: &mut App, key: KeyEvent) -> AppAction {
        // Ctrl+C quits from anywhere, even while a dialog is waiting on the network
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.confirm_quit();
            return AppAction::Quit;
        }

        match &app.input_mode {
            InputMode::Normal => self.handle_normal_mode(app, key),
            InputMode::AddServer(_) => self.handle_add_server_mode(app, key),
            InputMode::SendMessage(_) | InputMode::KillUsers(_) => {
                self.handle_bulk_mode(app, key)
            }
            InputMode::Help => self.handle_help_mode(app, key),
            InputMode::ConfirmQuit => self.handle_confirm_quit_mode(app, key),
        }
    }

    /// Handle key events in normal navigation mode
    fn handle_normal_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            // Quit
            KeyCode::Char('q') => {
                app.show_quit_confirm();
                AppAction::None
            }

            // Navigation
            KeyCode::Tab => {
                app.toggle_pane();
                AppAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.navigate_up();
                AppAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.navigate_down();
                AppAction::None
            }

            // Selection
            KeyCode::Char(' ') if app.active_pane == ActivePane::Users => {
                app.user_list.toggle_cursor_row();
                AppAction::None
            }
            KeyCode::Char('A') => {
                app.user_list.toggle_check_all();
                AppAction::None
            }

            // Actions
            KeyCode::Enter => app.handle_enter(),
            KeyCode::Char('r') => app.handle_refresh(),
            KeyCode::Char('a') => {
                app.start_add_server();
                AppAction::None
            }
            KeyCode::Char('m') => {
                app.start_send_message();
                AppAction::None
            }
            KeyCode::Char('x') => {
                app.start_kill_users();
                AppAction::None
            }

            // Help
            KeyCode::Char('?') => {
                app.show_help();
                AppAction::None
            }

            _ => AppAction::None,
        }
    }

    /// Handle key events while the add-server dialog is open
    fn handle_add_server_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        let InputMode::AddServer(dialog) = &mut app.input_mode else {
            return AppAction::None;
        };

        match dialog.handle_key(key, &app.settings) {
            DialogResponse::Pending => AppAction::None,
            DialogResponse::Cancelled => {
                app.cancel_input();
                AppAction::None
            }
            DialogResponse::Submitted(request) => {
                app.set_status(format!(
                    "Validating {}:{}...",
                    request.address, request.port
                ));
                AppAction::ValidateServer(request)
            }
        }
    }

    /// Handle key events in the send-message and disconnect dialogs
    fn handle_bulk_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        let response = match &mut app.input_mode {
            InputMode::SendMessage(dialog) => dialog.handle_key(key),
            InputMode::KillUsers(dialog) => dialog.handle_key(key),
            _ => return AppAction::None,
        };

        match response {
            DialogResponse::Pending => AppAction::None,
            DialogResponse::Cancelled => {
                app.cancel_input();
                AppAction::None
            }
            DialogResponse::Submitted(action) => {
                app.cancel_input();
                app.set_status(format!("{} in progress...", action.describe()));
                AppAction::Bulk(action)
            }
        }
    }

    /// Handle key events in help overlay mode
    fn handle_help_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q') => {
                app.cancel_input();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    /// Handle key events in quit confirmation mode
    fn handle_confirm_quit_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.confirm_quit();
                AppAction::Quit
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_input();
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}
