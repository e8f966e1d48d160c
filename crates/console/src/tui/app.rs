//! TUI application state
//!
//! Manages the registered servers, the user list bound to one of them,
//! two-pane navigation, and the modal dialogs. All mutation happens on the
//! UI task; remote work is requested through `AppAction` and its results
//! come back as `TuiMessage`s.

use tracing::{error, info, warn};

use monitor::{MonitorClient, SharedServer};

use super::TuiMessage;
use super::dialogs::{
    AddServerDialog, BulkAction, KillUsersDialog, SendMessageDialog, ServerRequest,
};
use super::user_list::{FetchRequest, UserList};
use crate::config::{ConsoleConfig, ServerSettings};

/// A registered server with its live handle
#[derive(Debug, Clone)]
pub struct ServerEntry {
    pub name: String,
    pub address: String,
    pub port: u16,
    pub server: SharedServer,
}

/// A server that passed validation, ready to be registered
#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
    pub server: SharedServer,
}

/// Active pane in the two-pane layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Server list pane (left)
    Servers,
    /// User list pane (right)
    Users,
}

/// Input mode for the application
#[derive(Debug)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Add-server dialog open
    AddServer(AddServerDialog),
    /// Send-message dialog open
    SendMessage(SendMessageDialog),
    /// Disconnect-users dialog open
    KillUsers(KillUsersDialog),
    /// Showing help overlay
    Help,
    /// Confirm quit dialog
    ConfirmQuit,
}

/// User action to be processed by the main loop
#[derive(Debug, Clone)]
pub enum AppAction {
    /// No action
    None,
    /// Quit the application
    Quit,
    /// Create a server handle and validate it
    ValidateServer(ServerRequest),
    /// Fetch the users of a bound server
    FetchUsers(FetchRequest),
    /// Run a bulk operation on selected users
    Bulk(BulkAction),
    /// Write the settings file
    SaveSettings,
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Registered servers, in insertion order
    pub servers: Vec<ServerEntry>,
    /// Persisted settings, kept in step with `servers`
    pub settings: ConsoleConfig,
    /// Users of the bound server
    pub user_list: UserList,
    /// Currently active pane
    pub active_pane: ActivePane,
    /// Selected server index
    pub selected_server: usize,
    /// Current input mode
    pub input_mode: InputMode,
    /// Status message to display
    pub status_message: Option<String>,
    /// Animation counter advanced on every idle tick
    pub tick: u64,
    /// Should quit flag
    pub should_quit: bool,
}

impl App {
    /// Create the application state, opening a handle for every stored server
    pub fn new(settings: ConsoleConfig, client: &dyn MonitorClient) -> Self {
        let servers = settings
            .servers
            .iter()
            .map(|stored| {
                let mut server = client.create_monitor_server();
                server.set_address(stored.address.clone());
                server.set_port(stored.port);
                ServerEntry {
                    name: stored.name.clone(),
                    address: stored.address.clone(),
                    port: stored.port,
                    server: SharedServer::from(server),
                }
            })
            .collect();

        Self {
            servers,
            settings,
            user_list: UserList::new(),
            active_pane: ActivePane::Servers,
            selected_server: 0,
            input_mode: InputMode::Normal,
            status_message: None,
            tick: 0,
            should_quit: false,
        }
    }

    /// Register a validated server and select it
    pub fn add_server(&mut self, new_server: NewServer) {
        let NewServer { name, server } = new_server;
        let address = server.address().to_string();
        let port = server.port();

        info!("Registered server {} ({}:{})", name, address, port);
        self.settings.add_server(ServerSettings {
            name: name.clone(),
            address: address.clone(),
            port,
        });
        self.servers.push(ServerEntry {
            name,
            address,
            port,
            server,
        });
        self.selected_server = self.servers.len() - 1;
    }

    /// Get the currently selected server
    pub fn selected_server(&self) -> Option<&ServerEntry> {
        self.servers.get(self.selected_server)
    }

    /// Switch active pane
    pub fn toggle_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Servers => ActivePane::Users,
            ActivePane::Users => ActivePane::Servers,
        };
    }

    /// Navigate up in current list
    pub fn navigate_up(&mut self) {
        match self.active_pane {
            ActivePane::Servers => {
                self.selected_server = self.selected_server.saturating_sub(1);
            }
            ActivePane::Users => self.user_list.move_up(),
        }
    }

    /// Navigate down in current list
    pub fn navigate_down(&mut self) {
        match self.active_pane {
            ActivePane::Servers => {
                if self.selected_server + 1 < self.servers.len() {
                    self.selected_server += 1;
                }
            }
            ActivePane::Users => self.user_list.move_down(),
        }
    }

    /// Handle Enter key press
    pub fn handle_enter(&mut self) -> AppAction {
        match self.active_pane {
            ActivePane::Servers => {
                let Some(entry) = self.selected_server() else {
                    return AppAction::None;
                };
                let server = entry.server.clone();
                let name = entry.name.clone();
                self.active_pane = ActivePane::Users;
                self.set_status(format!("Loading users of {}...", name));
                AppAction::FetchUsers(self.user_list.set_server(server))
            }
            ActivePane::Users => {
                self.user_list.toggle_cursor_row();
                AppAction::None
            }
        }
    }

    /// Handle 'r' key (refresh)
    pub fn handle_refresh(&mut self) -> AppAction {
        match self.user_list.refresh() {
            Some(request) => {
                self.set_status("Refreshing user list...".to_string());
                AppAction::FetchUsers(request)
            }
            None => AppAction::None,
        }
    }

    /// Handle 'a' key (add server)
    pub fn start_add_server(&mut self) {
        self.input_mode = InputMode::AddServer(AddServerDialog::new());
    }

    /// Handle 'm' key (send message to selected users)
    pub fn start_send_message(&mut self) {
        if let Some(dialog) = self.user_list.open_send_message() {
            self.input_mode = InputMode::SendMessage(dialog);
        }
    }

    /// Handle 'x' key (disconnect selected users)
    pub fn start_kill_users(&mut self) {
        if let Some(dialog) = self.user_list.open_kill_users() {
            self.input_mode = InputMode::KillUsers(dialog);
        }
    }

    /// Cancel current input mode
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Show quit confirmation
    pub fn show_quit_confirm(&mut self) {
        self.input_mode = InputMode::ConfirmQuit;
    }

    /// Confirm quit
    pub fn confirm_quit(&mut self) {
        self.should_quit = true;
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Advance animations
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Apply the result of an async task
    pub fn handle_message(&mut self, msg: TuiMessage) -> AppAction {
        match msg {
            TuiMessage::ServerValidated {
                request,
                server,
                outcome,
            } => {
                let InputMode::AddServer(dialog) = &mut self.input_mode else {
                    warn!(
                        "Validation of {} finished with no dialog open",
                        request.name
                    );
                    return AppAction::None;
                };

                if !dialog.finish_validation(&request, &outcome) {
                    return AppAction::None;
                }

                self.input_mode = InputMode::Normal;
                self.add_server(NewServer {
                    name: request.name.clone(),
                    server,
                });
                self.set_status(format!("Added server {}", request.name));
                AppAction::SaveSettings
            }
            TuiMessage::UsersFetched { generation, result } => {
                match result {
                    Ok(users) => {
                        let count = users.len();
                        if self.user_list.apply_users(generation, users) {
                            self.set_status(format!("{} user(s) connected", count));
                        }
                    }
                    Err(e) if self.user_list.is_current(generation) => {
                        error!("Failed to fetch users: {}", e);
                        self.set_status(format!("Failed to fetch users: {}", e));
                    }
                    Err(e) => {
                        warn!("Stale user fetch failed: {}", e);
                    }
                }
                AppAction::None
            }
            TuiMessage::BulkFinished {
                description,
                result,
            } => match result {
                Ok(()) => {
                    info!("{} completed", description);
                    self.set_status(format!("{} completed", description));
                    self.handle_refresh()
                }
                Err(e) => {
                    error!("{} failed: {}", description, e);
                    self.set_status(format!("{} failed: {}", description, e));
                    AppAction::None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::create_mock_user_list;
    use monitor::{MonitorError, SimulatedClient, ValidationOutcome};

    fn settings() -> ConsoleConfig {
        let mut config = ConsoleConfig::default();
        config.add_server(ServerSettings {
            name: "prod".to_string(),
            address: "10.0.0.1".to_string(),
            port: 1234,
        });
        config.add_server(ServerSettings {
            name: "homolog".to_string(),
            address: "10.0.0.2".to_string(),
            port: 1234,
        });
        config
    }

    fn handle(client: &SimulatedClient, address: &str, port: u16) -> SharedServer {
        let mut server = client.create_monitor_server();
        server.set_address(address.to_string());
        server.set_port(port);
        SharedServer::from(server)
    }

    #[test]
    fn test_app_creation_opens_stored_servers() {
        let client = SimulatedClient::demo();
        let app = App::new(settings(), &client);

        assert_eq!(app.servers.len(), 2);
        assert_eq!(app.servers[1].server.address(), "10.0.0.2");
        assert_eq!(app.active_pane, ActivePane::Servers);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_navigate() {
        let client = SimulatedClient::demo();
        let mut app = App::new(settings(), &client);

        app.navigate_down();
        assert_eq!(app.selected_server, 1);
        app.navigate_down();
        assert_eq!(app.selected_server, 1);
        app.navigate_up();
        app.navigate_up();
        assert_eq!(app.selected_server, 0);
    }

    #[test]
    fn test_enter_binds_user_list() {
        let client = SimulatedClient::demo();
        let mut app = App::new(settings(), &client);
        app.navigate_down();

        let AppAction::FetchUsers(request) = app.handle_enter() else {
            panic!("Expected a fetch");
        };
        assert_eq!(request.server.address(), "10.0.0.2");
        assert_eq!(app.active_pane, ActivePane::Users);
        assert!(app.user_list.is_current(request.generation));
    }

    #[test]
    fn test_add_server_appends_once_and_selects() {
        let client = SimulatedClient::demo();
        let mut app = App::new(settings(), &client);

        app.add_server(NewServer {
            name: "dev".to_string(),
            server: handle(&client, "10.0.0.3", 99),
        });

        assert_eq!(app.servers.len(), 3);
        assert_eq!(app.selected_server, 2);
        assert_eq!(app.settings.servers.len(), 3);
        assert!(app.settings.find_conflict("x", "10.0.0.3", 99).is_some());
    }

    #[test]
    fn test_valid_outcome_closes_dialog_and_saves() {
        let client = SimulatedClient::demo();
        let mut app = App::new(ConsoleConfig::default(), &client);
        app.start_add_server();

        let request = ServerRequest {
            name: "dev".to_string(),
            address: "10.0.0.3".to_string(),
            port: 99,
        };
        let action = app.handle_message(TuiMessage::ServerValidated {
            request: request.clone(),
            server: handle(&client, "10.0.0.3", 99),
            outcome: ValidationOutcome::Valid,
        });

        assert!(matches!(action, AppAction::SaveSettings));
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.servers.len(), 1);
        assert_eq!(app.servers[0].name, "dev");
    }

    #[test]
    fn test_failed_outcome_keeps_dialog_open() {
        let client = SimulatedClient::demo();
        let mut app = App::new(ConsoleConfig::default(), &client);
        app.start_add_server();

        let request = ServerRequest {
            name: "dev".to_string(),
            address: "10.0.0.3".to_string(),
            port: 99,
        };
        for outcome in [
            ValidationOutcome::Invalid,
            ValidationOutcome::Failed("refused".to_string()),
        ] {
            let action = app.handle_message(TuiMessage::ServerValidated {
                request: request.clone(),
                server: handle(&client, "10.0.0.3", 99),
                outcome,
            });
            assert!(matches!(action, AppAction::None));
            assert!(matches!(app.input_mode, InputMode::AddServer(_)));
        }
        assert!(app.servers.is_empty());
    }

    #[test]
    fn test_users_fetched_updates_rows() {
        let client = SimulatedClient::demo();
        let mut app = App::new(settings(), &client);
        let AppAction::FetchUsers(request) = app.handle_enter() else {
            panic!("Expected a fetch");
        };

        app.handle_message(TuiMessage::UsersFetched {
            generation: request.generation,
            result: Ok(create_mock_user_list(4)),
        });
        assert_eq!(app.user_list.rows().len(), 4);
        assert_eq!(app.status_message.as_deref(), Some("4 user(s) connected"));
    }

    #[test]
    fn test_fetch_error_leaves_rows() {
        let client = SimulatedClient::demo();
        let mut app = App::new(settings(), &client);
        let AppAction::FetchUsers(first) = app.handle_enter() else {
            panic!("Expected a fetch");
        };
        app.handle_message(TuiMessage::UsersFetched {
            generation: first.generation,
            result: Ok(create_mock_user_list(2)),
        });

        let AppAction::FetchUsers(second) = app.handle_refresh() else {
            panic!("Expected a fetch");
        };
        app.handle_message(TuiMessage::UsersFetched {
            generation: second.generation,
            result: Err(MonitorError::Other("gone".to_string())),
        });

        assert_eq!(app.user_list.rows().len(), 2);
        assert!(app.status_message.unwrap().contains("gone"));
    }

    #[test]
    fn test_bulk_success_refreshes() {
        let client = SimulatedClient::demo();
        let mut app = App::new(settings(), &client);
        app.handle_enter();

        let action = app.handle_message(TuiMessage::BulkFinished {
            description: "Disconnect of 1 user(s)".to_string(),
            result: Ok(()),
        });
        assert!(matches!(action, AppAction::FetchUsers(_)));
    }

    #[test]
    fn test_toggle_pane() {
        let client = SimulatedClient::demo();
        let mut app = App::new(ConsoleConfig::default(), &client);

        app.toggle_pane();
        assert_eq!(app.active_pane, ActivePane::Users);
        app.toggle_pane();
        assert_eq!(app.active_pane, ActivePane::Servers);
    }
}
