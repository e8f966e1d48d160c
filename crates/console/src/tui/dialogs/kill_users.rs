//! Disconnect-users confirmation dialog

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use monitor::{MonitorUser, SharedServer};

use super::{BaseKey, BulkAction, DialogBase, DialogResponse, centered_fixed};

const BUTTON_CANCEL: usize = 1;

/// Confirm dropping the connections of the selected users
#[derive(Debug, Clone)]
pub struct KillUsersDialog {
    base: DialogBase,
    server: SharedServer,
    users: Vec<MonitorUser>,
}

impl KillUsersDialog {
    pub fn new(server: SharedServer, users: Vec<MonitorUser>) -> Self {
        Self {
            base: DialogBase::new("Disconnect Users", &["Ok", "Cancel"], 0, true),
            server,
            users,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResponse<BulkAction> {
        match self.base.handle_key(key) {
            BaseKey::Close | BaseKey::Activate(BUTTON_CANCEL) => DialogResponse::Cancelled,
            BaseKey::Activate(_) => DialogResponse::Submitted(BulkAction::KillUsers {
                server: self.server.clone(),
                users: self.users.clone(),
            }),
            BaseKey::Consumed | BaseKey::Field(..) => DialogResponse::Pending,
        }
    }

    /// Frame height: up to ten user lines plus header, border and footer
    fn height(&self) -> u16 {
        self.users.len().min(10) as u16 + 7
    }

    pub fn render(&self, frame: &mut Frame, tick: u64) {
        let area = centered_fixed(50, self.height(), frame.area());
        let inner = self.base.render_frame(frame, area);
        let body = self.base.render_footer(frame, inner, tick);

        let mut lines = vec![
            Line::from(Span::styled(
                format!(
                    "Disconnect {} user(s) from {}:{}?",
                    self.users.len(),
                    self.server.address(),
                    self.server.port()
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for user in &self.users {
            lines.push(Line::from(format!(
                "{} @ {} (thread {})",
                user.username, user.computer_name, user.thread_id
            )));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            body,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::create_mock_user_list;
    use crossterm::event::{KeyCode, KeyModifiers};
    use monitor::{MonitorClient, SimulatedClient};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn dialog() -> KillUsersDialog {
        let client = SimulatedClient::demo();
        let server: SharedServer = Arc::from(client.create_monitor_server());
        KillUsersDialog::new(server, create_mock_user_list(3))
    }

    #[test]
    fn test_ok_submits_all_users() {
        let mut dialog = dialog();
        match dialog.handle_key(key(KeyCode::Enter)) {
            DialogResponse::Submitted(BulkAction::KillUsers { users, .. }) => {
                assert_eq!(users.len(), 3)
            }
            other => panic!("Expected submission, got {:?}", other),
        }
    }

    #[test]
    fn test_height_clamps_long_lists() {
        let server: SharedServer = Arc::from(SimulatedClient::demo().create_monitor_server());
        let few = KillUsersDialog::new(server.clone(), create_mock_user_list(2));
        assert_eq!(few.height(), 9);

        // 65_537 users would wrap to 1 if the count were narrowed first
        let many = KillUsersDialog::new(server, create_mock_user_list(65_537));
        assert_eq!(many.height(), 17);
    }

    #[test]
    fn test_cancel_button() {
        let mut dialog = dialog();
        dialog.handle_key(key(KeyCode::Right));
        assert!(matches!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogResponse::Cancelled
        ));
    }
}
