//! User list bound to the current server
//!
//! Binding a server bumps a generation counter and yields a `FetchRequest`
//! stamped with it. When the fetch completes, `apply_users` only accepts
//! the response if its generation is still current, so a slow answer for a
//! server the user already moved away from never overwrites the rows.
//!
//! Rows are rebuilt wholesale on every accepted response; selection does not
//! survive a refresh.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use tracing::debug;

use monitor::{MonitorUser, SharedServer};

use super::dialogs::{KillUsersDialog, SendMessageDialog};
use super::widgets::{Button, Checkbox, colors};

/// Column headers, in display order after the checkbox column
const COLUMNS: [&str; 16] = [
    "User Name",
    "Environment",
    "Machine",
    "Thread ID",
    "User In Server",
    "Program",
    "Connected",
    "Elapsed Time",
    "Instructions",
    "Instructions/Seconds",
    "Comments",
    "Memory",
    "SID",
    "RPO",
    "Inactive Time",
    "Connection Type",
];

/// Summary of row selection shown on the check-all button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckAllState {
    /// No row checked
    None,
    /// Some but not all rows checked
    Some,
    /// Every row checked
    All,
}

impl CheckAllState {
    /// State for `checked` rows out of `total`
    pub fn from_counts(checked: usize, total: usize) -> Self {
        if checked == 0 {
            CheckAllState::None
        } else if checked == total {
            CheckAllState::All
        } else {
            CheckAllState::Some
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            CheckAllState::None => "[ ]",
            CheckAllState::Some => "[-]",
            CheckAllState::All => "[x]",
        }
    }
}

/// One user record with its selection checkbox
#[derive(Debug, Clone)]
pub struct UserRow {
    user: MonitorUser,
    checkbox: Checkbox,
}

impl UserRow {
    pub fn new(user: MonitorUser) -> Self {
        Self {
            user,
            checkbox: Checkbox::default(),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checkbox.is_checked()
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checkbox.set_checked(checked);
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        let u = &self.user;
        vec![
            Cell::from(self.checkbox.span()),
            Cell::from(u.username.clone()),
            Cell::from(u.environment.clone()),
            Cell::from(u.computer_name.clone()),
            Cell::from(u.thread_id.to_string()),
            Cell::from(u.server.clone()),
            Cell::from(u.main_name.clone()),
            Cell::from(u.login_time.clone()),
            Cell::from(u.elapsed_time.clone()),
            Cell::from(u.total_instructions.to_string()),
            Cell::from(u.instructions_per_second.to_string()),
            Cell::from(u.remarks.clone()),
            Cell::from(format_memory(u.memory)),
            Cell::from(u.sid.clone()),
            Cell::from(u.rpo.clone()),
            Cell::from(u.inactivity_time.clone()),
            Cell::from(u.connection_type.clone()),
        ]
    }
}

/// Users fetch to run for a bound server
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub generation: u64,
    pub server: SharedServer,
}

#[derive(Debug)]
pub struct UserList {
    server: Option<SharedServer>,
    generation: u64,
    rows: Vec<UserRow>,
    cursor: usize,
    send_button: Button,
    disconnect_button: Button,
}

impl Default for UserList {
    fn default() -> Self {
        Self::new()
    }
}

impl UserList {
    pub fn new() -> Self {
        let mut list = Self {
            server: None,
            generation: 0,
            rows: Vec::new(),
            cursor: 0,
            send_button: Button::new("Send Message (m)"),
            disconnect_button: Button::new("Disconnect (x)"),
        };
        list.sync_buttons();
        list
    }

    pub fn server(&self) -> Option<&SharedServer> {
        self.server.as_ref()
    }

    /// Bind a server and request its users; current rows stay until the answer arrives
    pub fn set_server(&mut self, server: SharedServer) -> FetchRequest {
        self.server = Some(server.clone());
        self.generation += 1;
        FetchRequest {
            generation: self.generation,
            server,
        }
    }

    /// Request the users of the bound server again
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        let server = self.server.clone()?;
        Some(self.set_server(server))
    }

    /// Whether a response stamped `generation` is still wanted
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Replace the rows with a fetched user list; stale responses are dropped
    pub fn apply_users(&mut self, generation: u64, users: Vec<MonitorUser>) -> bool {
        if !self.is_current(generation) {
            debug!(
                "Dropping stale user list (generation {}, current {})",
                generation, self.generation
            );
            return false;
        }

        self.rows = users.into_iter().map(UserRow::new).collect();
        self.cursor = 0;
        self.sync_buttons();
        true
    }

    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_checked()).count()
    }

    /// True when at least one row is checked
    pub fn any_selected(&self) -> bool {
        self.rows.iter().any(|r| r.is_checked())
    }

    pub fn check_all_state(&self) -> CheckAllState {
        CheckAllState::from_counts(self.checked_count(), self.rows.len())
    }

    /// Check every row when none is checked, otherwise uncheck every row
    pub fn toggle_check_all(&mut self) {
        let check = !self.any_selected();
        for row in &mut self.rows {
            row.set_checked(check);
        }
        self.sync_buttons();
    }

    pub fn toggle_row(&mut self, index: usize) {
        if let Some(row) = self.rows.get_mut(index) {
            row.checkbox.toggle();
            self.sync_buttons();
        }
    }

    pub fn toggle_cursor_row(&mut self) {
        self.toggle_row(self.cursor);
    }

    /// Users of the checked rows, in display order
    pub fn selected_users(&self) -> Vec<MonitorUser> {
        self.rows
            .iter()
            .filter(|r| r.is_checked())
            .map(|r| r.user.clone())
            .collect()
    }

    /// Dialog for messaging the selected users, if the action is enabled
    pub fn open_send_message(&self) -> Option<SendMessageDialog> {
        if self.send_button.is_disabled() {
            return None;
        }
        let server = self.server.clone()?;
        Some(SendMessageDialog::new(server, self.selected_users()))
    }

    /// Dialog for disconnecting the selected users, if the action is enabled
    pub fn open_kill_users(&self) -> Option<KillUsersDialog> {
        if self.disconnect_button.is_disabled() {
            return None;
        }
        let server = self.server.clone()?;
        Some(KillUsersDialog::new(server, self.selected_users()))
    }

    fn sync_buttons(&mut self) {
        let disabled = !self.any_selected();
        self.send_button.set_disabled(disabled);
        self.disconnect_button.set_disabled(disabled);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        let border_color = if active {
            colors::FOCUSED
        } else {
            Color::Gray
        };
        let title = if active { " Users (active) " } else { " Users " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);

        let Some(server) = &self.server else {
            let paragraph = Paragraph::new("No server selected\nPress Enter on a server")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let toolbar = Line::from(vec![
            Span::styled(
                format!("{} All (A)", self.check_all_state().icon()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            self.send_button.span(false),
            Span::raw("  "),
            self.disconnect_button.span(false),
            Span::styled(
                format!(
                    "   {}:{} | {} user(s)",
                    server.address(),
                    server.port(),
                    self.rows.len()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(toolbar), chunks[0]);

        let header = Row::new(
            std::iter::once("")
                .chain(COLUMNS)
                .map(Cell::from)
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let mut widths = vec![Constraint::Length(3)];
        widths.extend(COLUMNS.iter().map(|c| Constraint::Min(c.len().min(12) as u16)));

        let table = Table::new(self.rows.iter().map(|r| Row::new(r.cells())), widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .column_spacing(1);

        let mut state = TableState::default();
        if active && !self.rows.is_empty() {
            state.select(Some(self.cursor));
        }
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }
}

/// Human-readable byte count
fn format_memory(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::dialogs::{BulkAction, DialogResponse};
    use common::test_utils::create_mock_user_list;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use monitor::{MonitorClient, SimulatedClient};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn server() -> SharedServer {
        Arc::from(SimulatedClient::demo().create_monitor_server())
    }

    fn list_with(count: u64) -> UserList {
        let mut list = UserList::new();
        let request = list.set_server(server());
        assert!(list.apply_users(request.generation, create_mock_user_list(count)));
        list
    }

    #[test]
    fn test_check_all_state_from_counts() {
        assert_eq!(CheckAllState::from_counts(0, 5), CheckAllState::None);
        assert_eq!(CheckAllState::from_counts(5, 5), CheckAllState::All);
        assert_eq!(CheckAllState::from_counts(2, 5), CheckAllState::Some);
        assert_eq!(CheckAllState::from_counts(0, 0), CheckAllState::None);
    }

    #[test]
    fn test_check_all_icons() {
        assert_eq!(CheckAllState::None.icon(), "[ ]");
        assert_eq!(CheckAllState::Some.icon(), "[-]");
        assert_eq!(CheckAllState::All.icon(), "[x]");
    }

    #[test]
    fn test_toggle_check_all() {
        let mut list = list_with(4);
        assert_eq!(list.checked_count(), 0);

        list.toggle_check_all();
        assert_eq!(list.checked_count(), 4);
        assert_eq!(list.check_all_state(), CheckAllState::All);

        list.toggle_check_all();
        assert_eq!(list.checked_count(), 0);
        assert_eq!(list.check_all_state(), CheckAllState::None);
    }

    #[test]
    fn test_toggle_check_all_from_partial_unchecks() {
        let mut list = list_with(4);
        list.toggle_row(1);
        assert_eq!(list.check_all_state(), CheckAllState::Some);

        list.toggle_check_all();
        assert_eq!(list.checked_count(), 0);
    }

    #[test]
    fn test_actions_follow_selection() {
        let mut list = list_with(3);
        assert!(!list.any_selected());
        assert!(list.send_button.is_disabled());
        assert!(list.open_send_message().is_none());
        assert!(list.open_kill_users().is_none());

        list.toggle_row(2);
        assert!(list.any_selected());
        assert!(!list.disconnect_button.is_disabled());

        let mut dialog = list.open_kill_users().unwrap();
        match dialog.handle_key(key(KeyCode::Enter)) {
            DialogResponse::Submitted(BulkAction::KillUsers { users, .. }) => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].thread_id, 3);
            }
            other => panic!("Expected submission, got {:?}", other),
        }

        let mut dialog = list.open_send_message().unwrap();
        dialog.handle_key(key(KeyCode::Char('x')));
        match dialog.handle_key(key(KeyCode::Enter)) {
            DialogResponse::Submitted(BulkAction::SendMessage { users, .. }) => {
                assert_eq!(users[0].thread_id, 3);
            }
            other => panic!("Expected submission, got {:?}", other),
        }
    }

    #[test]
    fn test_rows_kept_until_fetch_resolves() {
        let mut list = list_with(3);
        list.toggle_row(0);

        let request = list.set_server(server());
        assert_eq!(list.rows().len(), 3);
        assert!(list.rows()[0].is_checked());

        assert!(list.apply_users(request.generation, create_mock_user_list(1)));
        assert_eq!(list.rows().len(), 1);
        assert!(!list.any_selected());
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let mut list = UserList::new();
        let first = list.set_server(server());
        let second = list.set_server(server());

        assert!(list.apply_users(second.generation, create_mock_user_list(2)));
        assert!(!list.apply_users(first.generation, create_mock_user_list(5)));
        assert_eq!(list.rows().len(), 2);
    }

    #[test]
    fn test_refresh_requires_server() {
        let mut list = UserList::new();
        assert!(list.refresh().is_none());

        let first = list.set_server(server());
        let refreshed = list.refresh().unwrap();
        assert!(refreshed.generation > first.generation);
        assert!(!list.is_current(first.generation));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut list = list_with(2);
        list.move_up();
        assert_eq!(list.cursor, 0);
        list.move_down();
        list.move_down();
        assert_eq!(list.cursor, 1);

        list.toggle_cursor_row();
        assert!(list.rows()[1].is_checked());
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory(512), "512 B");
        assert_eq!(format_memory(2048), "2.0 KB");
        assert_eq!(format_memory(3 * 1024 * 1024), "3.0 MB");
    }
}
