//! Modal dialogs
//!
//! `DialogBase` carries what every dialog shares: a title, a row of
//! buttons, an optional progress bar, the focus ring over fields and
//! buttons, and the blocked state used while a remote call is in flight.
//! Concrete dialogs own their fields and decide what the buttons mean.

pub mod add_server;
pub mod kill_users;
pub mod send_message;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use monitor::{MonitorUser, SharedServer};

use super::widgets::{Button, LinearProgress, colors};

pub use add_server::{AddServerDialog, ServerRequest};
pub use kill_users::KillUsersDialog;
pub use send_message::SendMessageDialog;

/// What a key press did to a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse<T> {
    /// Dialog stays open
    Pending,
    /// Dialog dismissed without side effects
    Cancelled,
    /// Dialog accepted; the payload is the work to perform
    Submitted(T),
}

/// Key routed through the base dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKey {
    /// Focus moved or the key was swallowed
    Consumed,
    /// Esc on a dialog that closes on Esc
    Close,
    /// Enter on a button, or Enter inside a field (activates the first button)
    Activate(usize),
    /// Key for the focused field
    Field(usize, KeyEvent),
}

/// Remote bulk operation requested from a dialog
#[derive(Debug, Clone)]
pub enum BulkAction {
    SendMessage {
        server: SharedServer,
        users: Vec<MonitorUser>,
        message: String,
    },
    KillUsers {
        server: SharedServer,
        users: Vec<MonitorUser>,
    },
}

impl BulkAction {
    /// Short description for the status bar and logs
    pub fn describe(&self) -> String {
        match self {
            BulkAction::SendMessage { users, .. } => {
                format!("Message to {} user(s)", users.len())
            }
            BulkAction::KillUsers { users, .. } => {
                format!("Disconnect of {} user(s)", users.len())
            }
        }
    }
}

/// State shared by all modal dialogs
#[derive(Debug, Clone)]
pub struct DialogBase {
    title: String,
    buttons: Vec<Button>,
    field_count: usize,
    focus: usize,
    esc_close: bool,
    progress: LinearProgress,
    blocked: bool,
}

impl DialogBase {
    pub fn new(title: &str, buttons: &[&str], field_count: usize, esc_close: bool) -> Self {
        Self {
            title: title.to_string(),
            buttons: buttons.iter().map(|label| Button::new(label)).collect(),
            field_count,
            focus: 0,
            esc_close,
            progress: LinearProgress::default(),
            blocked: false,
        }
    }

    #[cfg(test)]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Focused field index, if focus is on a field
    pub fn focused_field(&self) -> Option<usize> {
        (self.focus < self.field_count).then_some(self.focus)
    }

    /// Focused button index, if focus is on a button
    pub fn focused_button(&self) -> Option<usize> {
        self.focus.checked_sub(self.field_count)
    }

    pub fn focus_field(&mut self, index: usize) {
        if index < self.field_count {
            self.focus = index;
        }
    }

    fn focus_len(&self) -> usize {
        self.field_count + self.buttons.len()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.focus_len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.focus_len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Disable or re-enable every button; fields are handled by the owner
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
        for button in &mut self.buttons {
            button.set_disabled(blocked);
        }
    }

    #[cfg(test)]
    pub fn progress_visible(&self) -> bool {
        self.progress.is_visible()
    }

    pub fn set_progress(&mut self, visible: bool) {
        self.progress.set_visible(visible);
    }

    /// Route a key through focus handling
    pub fn handle_key(&mut self, key: KeyEvent) -> BaseKey {
        if self.blocked {
            return BaseKey::Consumed;
        }

        match key.code {
            KeyCode::Esc if self.esc_close => BaseKey::Close,
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                BaseKey::Consumed
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                BaseKey::Consumed
            }
            KeyCode::Left if self.focused_button().is_some() => {
                self.focus_prev();
                BaseKey::Consumed
            }
            KeyCode::Right if self.focused_button().is_some() => {
                self.focus_next();
                BaseKey::Consumed
            }
            KeyCode::Enter => BaseKey::Activate(self.focused_button().unwrap_or(0)),
            _ => match self.focused_field() {
                Some(field) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    BaseKey::Field(field, key)
                }
                _ => BaseKey::Consumed,
            },
        }
    }

    /// Clear `area`, draw the frame and return the inner area
    pub fn render_frame(&self, frame: &mut Frame, area: Rect) -> Rect {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::FOCUSED));

        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }

    /// Draw the progress line and the button row at the bottom of `inner`
    ///
    /// Returns the area left above them for the dialog body.
    pub fn render_footer(&self, frame: &mut Frame, inner: Rect, tick: u64) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Body
                Constraint::Length(1), // Progress
                Constraint::Length(1), // Buttons
            ])
            .split(inner);

        self.progress.render(frame, chunks[1], tick);

        let focused = self.focused_button();
        let mut spans = Vec::new();
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(button.span(focused == Some(i)));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            chunks[2],
        );

        chunks[0]
    }
}

/// Helper function to create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Rectangle of fixed height centered vertically, percentage width
pub fn centered_fixed(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let width = (u32::from(r.width) * u32::from(percent_x.min(100)) / 100) as u16;
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
