//! Add-server dialog
//!
//! Collects a name, address and port, rejects empty or duplicate entries
//! locally, and hands a `ServerRequest` to the runner for remote
//! validation. While validation is in flight every control is disabled and
//! the progress bar sweeps; `finish_validation` restores the controls and
//! says whether the dialog should close.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use thiserror::Error;
use tracing::{error, warn};

use monitor::ValidationOutcome;

use super::{BaseKey, DialogBase, DialogResponse, centered_fixed};
use crate::config::ConsoleConfig;
use crate::tui::widgets::{InputKind, TextInput, Warning};

pub const FIELD_NAME: usize = 0;
pub const FIELD_ADDRESS: usize = 1;
pub const FIELD_PORT: usize = 2;

const BUTTON_CANCEL: usize = 1;

/// Why a submission was rejected before any remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Invalid server name")]
    InvalidName,
    #[error("Invalid server address")]
    InvalidAddress,
    #[error("Invalid server port")]
    InvalidPort,
    #[error("Server data already registered")]
    AlreadyRegistered,
}

impl SubmitError {
    /// Field to highlight and its inline message
    fn field(self) -> Option<(usize, &'static str)> {
        match self {
            SubmitError::InvalidName => Some((FIELD_NAME, "Invalid name")),
            SubmitError::InvalidAddress => Some((FIELD_ADDRESS, "Invalid address")),
            SubmitError::InvalidPort => Some((FIELD_PORT, "Invalid port")),
            SubmitError::AlreadyRegistered => None,
        }
    }
}

/// A locally valid server awaiting remote validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRequest {
    pub name: String,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AddServerDialog {
    base: DialogBase,
    fields: [TextInput; 3],
    warning: Warning,
}

impl Default for AddServerDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl AddServerDialog {
    pub fn new() -> Self {
        Self {
            base: DialogBase::new("Add New Server", &["Ok", "Cancel"], 3, true),
            fields: [
                TextInput::new("Name", InputKind::Text),
                TextInput::new("Address", InputKind::Text),
                TextInput::new("Port", InputKind::Number),
            ],
            warning: Warning::default(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.base.is_blocked()
    }

    /// Disable or re-enable all inputs and buttons
    pub fn set_blocked(&mut self, blocked: bool) {
        self.base.set_blocked(blocked);
        for field in &mut self.fields {
            field.set_disabled(blocked);
        }
    }

    /// Check the fields against each other and the registered servers
    ///
    /// Checks run in a fixed order and the first failure wins.
    pub fn check(&self, settings: &ConsoleConfig) -> Result<ServerRequest, SubmitError> {
        let name = self.fields[FIELD_NAME].value().trim();
        let address = self.fields[FIELD_ADDRESS].value().trim();
        let port = self.fields[FIELD_PORT].value().trim();

        if name.is_empty() {
            return Err(SubmitError::InvalidName);
        }
        if address.is_empty() {
            return Err(SubmitError::InvalidAddress);
        }
        let port = match port.parse::<u16>() {
            Ok(port) if port > 0 => port,
            _ => return Err(SubmitError::InvalidPort),
        };

        if settings.find_conflict(name, address, port).is_some() {
            return Err(SubmitError::AlreadyRegistered);
        }

        Ok(ServerRequest {
            name: name.to_string(),
            address: address.to_string(),
            port,
        })
    }

    /// Handle Ok: surface the first error, or block the form for validation
    pub fn submit(&mut self, settings: &ConsoleConfig) -> Result<ServerRequest, SubmitError> {
        for field in &mut self.fields {
            field.clear_error();
        }
        self.warning.clear();

        match self.check(settings) {
            Ok(request) => {
                self.set_blocked(true);
                self.base.set_progress(true);
                Ok(request)
            }
            Err(err) => {
                self.base.set_progress(false);
                self.set_blocked(false);
                if let Some((index, message)) = err.field() {
                    self.fields[index].show_error(message);
                    self.base.focus_field(index);
                }
                self.warning.show(&err.to_string());
                Err(err)
            }
        }
    }

    /// Apply the result of remote validation; returns true when the dialog should close
    pub fn finish_validation(&mut self, request: &ServerRequest, outcome: &ValidationOutcome) -> bool {
        self.base.set_progress(false);
        self.set_blocked(false);

        match outcome {
            ValidationOutcome::Valid => true,
            ValidationOutcome::Invalid => {
                warn!(
                    "Validation of {}:{} failed: server refused",
                    request.address, request.port
                );
                false
            }
            ValidationOutcome::Failed(reason) => {
                error!(
                    "Validation of {}:{} failed: {}",
                    request.address, request.port, reason
                );
                false
            }
        }
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        settings: &ConsoleConfig,
    ) -> DialogResponse<ServerRequest> {
        match self.base.handle_key(key) {
            BaseKey::Consumed => DialogResponse::Pending,
            BaseKey::Close | BaseKey::Activate(BUTTON_CANCEL) => DialogResponse::Cancelled,
            BaseKey::Activate(_) => match self.submit(settings) {
                Ok(request) => DialogResponse::Submitted(request),
                Err(_) => DialogResponse::Pending,
            },
            BaseKey::Field(index, key) => {
                match key.code {
                    KeyCode::Char(c) => self.fields[index].push_char(c),
                    KeyCode::Backspace => self.fields[index].backspace(),
                    _ => {}
                }
                DialogResponse::Pending
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, tick: u64) {
        let area = centered_fixed(60, 20, frame.area());
        let inner = self.base.render_frame(frame, area);
        let body = self.base.render_footer(frame, inner, tick);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                 // Warning banner
                Constraint::Length(TextInput::HEIGHT), // Name
                Constraint::Length(TextInput::HEIGHT), // Address
                Constraint::Length(TextInput::HEIGHT), // Port
                Constraint::Min(0),
            ])
            .split(body);

        self.warning.render(frame, chunks[0]);
        let focused = self.base.focused_field();
        for (i, field) in self.fields.iter().enumerate() {
            field.render(frame, chunks[i + 1], focused == Some(i));
        }
    }
}
