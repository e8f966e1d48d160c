//! Send-message dialog

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};

use monitor::{MonitorUser, SharedServer};

use super::{BaseKey, BulkAction, DialogBase, DialogResponse, centered_fixed};
use crate::tui::widgets::{InputKind, TextInput, Warning};

const BUTTON_CANCEL: usize = 1;

/// Compose a message for the selected users of one server
#[derive(Debug, Clone)]
pub struct SendMessageDialog {
    base: DialogBase,
    server: SharedServer,
    users: Vec<MonitorUser>,
    message: TextInput,
    warning: Warning,
}

impl SendMessageDialog {
    pub fn new(server: SharedServer, users: Vec<MonitorUser>) -> Self {
        Self {
            base: DialogBase::new("Send Message", &["Ok", "Cancel"], 1, true),
            server,
            users,
            message: TextInput::new("Message", InputKind::Text),
            warning: Warning::default(),
        }
    }

    fn submit(&mut self) -> Option<BulkAction> {
        let text = self.message.value().trim();
        if text.is_empty() {
            self.message.show_error("Invalid message");
            self.warning.show("Message must not be empty");
            return None;
        }

        Some(BulkAction::SendMessage {
            server: self.server.clone(),
            users: self.users.clone(),
            message: text.to_string(),
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResponse<BulkAction> {
        match self.base.handle_key(key) {
            BaseKey::Consumed => DialogResponse::Pending,
            BaseKey::Close | BaseKey::Activate(BUTTON_CANCEL) => DialogResponse::Cancelled,
            BaseKey::Activate(_) => match self.submit() {
                Some(action) => DialogResponse::Submitted(action),
                None => DialogResponse::Pending,
            },
            BaseKey::Field(_, key) => {
                match key.code {
                    KeyCode::Char(c) => {
                        self.message.push_char(c);
                        self.warning.clear();
                    }
                    KeyCode::Backspace => self.message.backspace(),
                    _ => {}
                }
                DialogResponse::Pending
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, tick: u64) {
        let area = centered_fixed(60, 12, frame.area());
        let inner = self.base.render_frame(frame, area);
        let body = self.base.render_footer(frame, inner, tick);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(TextInput::HEIGHT),
                Constraint::Min(0),
            ])
            .split(body);

        self.warning.render(frame, chunks[0]);

        let recipients = self
            .users
            .iter()
            .map(|u| u.username.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        frame.render_widget(
            Paragraph::new(format!("To: {}", recipients)).style(Style::default().fg(Color::Gray)),
            chunks[1],
        );

        self.message
            .render(frame, chunks[2], self.base.focused_field() == Some(0));
    }
}
