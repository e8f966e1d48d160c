//! Background tasks
//!
//! Every remote call runs in its own tokio task and reports back to the UI
//! loop with a `TuiMessage`. Tasks never touch `App` directly.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use monitor::{MonitorClient, SharedServer, validate_server};

use super::TuiMessage;
use super::dialogs::{BulkAction, ServerRequest};
use super::user_list::FetchRequest;

/// Spawns remote calls and routes their results to the UI
#[derive(Clone)]
pub struct TaskSpawner {
    client: Arc<dyn MonitorClient>,
    tx: mpsc::Sender<TuiMessage>,
}

impl TaskSpawner {
    pub fn new(client: Arc<dyn MonitorClient>, tx: mpsc::Sender<TuiMessage>) -> Self {
        Self { client, tx }
    }

    /// Create a handle for the request and validate it in the background
    pub fn spawn_validate_server(&self, request: ServerRequest) {
        let mut server = self.client.create_monitor_server();
        server.set_address(request.address.clone());
        server.set_port(request.port);
        let server = SharedServer::from(server);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            debug!("Validating {}:{}", request.address, request.port);
            let outcome = validate_server(server.as_ref()).await;
            let msg = TuiMessage::ServerValidated {
                request,
                server,
                outcome,
            };
            if tx.send(msg).await.is_err() {
                warn!("UI closed before validation finished");
            }
        });
    }

    /// Fetch the users of a bound server
    pub fn spawn_fetch_users(&self, request: FetchRequest) {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let FetchRequest { generation, server } = request;
            let result = server.get_users().await;
            let msg = TuiMessage::UsersFetched { generation, result };
            if tx.send(msg).await.is_err() {
                warn!("UI closed before users fetch {} finished", generation);
            }
        });
    }

    /// Run a send-message or disconnect operation
    pub fn spawn_bulk(&self, action: BulkAction) {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let description = action.describe();
            let result = match &action {
                BulkAction::SendMessage {
                    server,
                    users,
                    message,
                } => server.send_message(users, message).await,
                BulkAction::KillUsers { server, users } => server.kill_users(users).await,
            };
            let msg = TuiMessage::BulkFinished {
                description,
                result,
            };
            if tx.send(msg).await.is_err() {
                warn!("UI closed before bulk operation finished");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConsoleConfig, ServerSettings};
    use crate::tui::app::{App, AppAction, InputMode};
    use crate::tui::dialogs::add_server::SubmitError;
    use crate::tui::events::EventHandler;
    use common::test_utils::{DEFAULT_TEST_TIMEOUT, create_mock_user_list, with_timeout};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use monitor::SimulatedClient;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn fill_add_server(handler: &EventHandler, app: &mut App, name: &str, addr: &str, port: &str) {
        handler.handle_key(app, key(KeyCode::Char('a')));
        for (i, text) in [name, addr, port].into_iter().enumerate() {
            if i > 0 {
                handler.handle_key(app, key(KeyCode::Tab));
            }
            for c in text.chars() {
                handler.handle_key(app, key(KeyCode::Char(c)));
            }
        }
    }

    /// Drive one action through the spawner and feed the answer back into the app
    async fn round_trip(
        spawner: &TaskSpawner,
        rx: &mut mpsc::Receiver<TuiMessage>,
        app: &mut App,
        action: AppAction,
    ) -> AppAction {
        match action {
            AppAction::ValidateServer(request) => spawner.spawn_validate_server(request),
            AppAction::FetchUsers(request) => spawner.spawn_fetch_users(request),
            AppAction::Bulk(action) => spawner.spawn_bulk(action),
            other => panic!("No task for {:?}", other),
        }
        let msg = with_timeout(DEFAULT_TEST_TIMEOUT, rx.recv())
            .await
            .expect("task timed out")
            .expect("channel closed");
        app.handle_message(msg)
    }

    fn setup(client: SimulatedClient) -> (App, TaskSpawner, mpsc::Receiver<TuiMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let app = App::new(ConsoleConfig::default(), &client);
        let spawner = TaskSpawner::new(Arc::new(client), tx);
        (app, spawner, rx)
    }

    #[tokio::test]
    async fn test_add_server_success_registers_once() {
        let client = SimulatedClient::builder()
            .with_host("10.0.0.5", 7000, create_mock_user_list(2))
            .build();
        let (mut app, spawner, mut rx) = setup(client);
        let handler = EventHandler::new();

        fill_add_server(&handler, &mut app, "prod", "10.0.0.5", "7000");
        let action = handler.handle_key(&mut app, key(KeyCode::Enter));
        let action = round_trip(&spawner, &mut rx, &mut app, action).await;

        assert!(matches!(action, AppAction::SaveSettings));
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.servers.len(), 1);
        assert_eq!(app.servers[0].server.address(), "10.0.0.5");
        assert_eq!(app.settings.servers.len(), 1);
    }

    #[tokio::test]
    async fn test_add_server_refused_keeps_dialog_open() {
        let client = SimulatedClient::builder()
            .with_refusing_host("10.0.0.6", 7000)
            .build();
        let (mut app, spawner, mut rx) = setup(client);
        let handler = EventHandler::new();

        fill_add_server(&handler, &mut app, "stage", "10.0.0.6", "7000");
        let action = handler.handle_key(&mut app, key(KeyCode::Enter));
        let action = round_trip(&spawner, &mut rx, &mut app, action).await;

        assert!(matches!(action, AppAction::None));
        assert!(app.servers.is_empty());
        let InputMode::AddServer(dialog) = &app.input_mode else {
            panic!("Dialog should stay open");
        };
        assert!(!dialog.is_blocked());
    }

    #[tokio::test]
    async fn test_add_server_unreachable_keeps_dialog_open() {
        let (mut app, spawner, mut rx) = setup(SimulatedClient::builder().build());
        let handler = EventHandler::new();

        fill_add_server(&handler, &mut app, "ghost", "10.9.9.9", "1");
        let action = handler.handle_key(&mut app, key(KeyCode::Enter));
        round_trip(&spawner, &mut rx, &mut app, action).await;

        assert!(app.servers.is_empty());
        assert!(matches!(app.input_mode, InputMode::AddServer(_)));
    }

    #[tokio::test]
    async fn test_duplicate_server_makes_no_remote_call() {
        let client = SimulatedClient::demo();
        let (tx, mut rx) = mpsc::channel(16);
        let mut settings = ConsoleConfig::default();
        settings.add_server(ServerSettings {
            name: "prod".to_string(),
            address: "10.0.0.5".to_string(),
            port: 7000,
        });
        let mut app = App::new(settings, &client);
        let _spawner = TaskSpawner::new(Arc::new(client), tx);
        let handler = EventHandler::new();

        fill_add_server(&handler, &mut app, "other", "10.0.0.5", "7000");
        let action = handler.handle_key(&mut app, key(KeyCode::Enter));

        assert!(matches!(action, AppAction::None));
        assert!(rx.try_recv().is_err());
        let InputMode::AddServer(dialog) = &app.input_mode else {
            panic!("Dialog should stay open");
        };
        assert_eq!(
            dialog.check(&app.settings),
            Err(SubmitError::AlreadyRegistered)
        );
        assert!(!dialog.is_blocked());
    }

    #[tokio::test]
    async fn test_stale_fetch_is_dropped() {
        let client = SimulatedClient::builder()
            .with_host("10.0.0.1", 1, create_mock_user_list(1))
            .with_host("10.0.0.2", 1, create_mock_user_list(5))
            .build();
        let (tx, mut rx) = mpsc::channel(16);
        let mut settings = ConsoleConfig::default();
        for (name, address) in [("a", "10.0.0.1"), ("b", "10.0.0.2")] {
            settings.add_server(ServerSettings {
                name: name.to_string(),
                address: address.to_string(),
                port: 1,
            });
        }
        let mut app = App::new(settings, &client);
        let spawner = TaskSpawner::new(Arc::new(client), tx);

        let AppAction::FetchUsers(first) = app.handle_enter() else {
            panic!("Expected a fetch");
        };
        app.active_pane = crate::tui::app::ActivePane::Servers;
        app.navigate_down();
        let AppAction::FetchUsers(second) = app.handle_enter() else {
            panic!("Expected a fetch");
        };

        spawner.spawn_fetch_users(first);
        let msg = with_timeout(DEFAULT_TEST_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        app.handle_message(msg);
        assert!(app.user_list.rows().is_empty());

        spawner.spawn_fetch_users(second);
        let msg = with_timeout(DEFAULT_TEST_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        app.handle_message(msg);
        assert_eq!(app.user_list.rows().len(), 5);
    }

    #[tokio::test]
    async fn test_kill_users_refreshes_list() {
        let client = SimulatedClient::builder()
            .with_host("10.0.0.1", 1, create_mock_user_list(3))
            .build();
        let (tx, mut rx) = mpsc::channel(16);
        let mut settings = ConsoleConfig::default();
        settings.add_server(ServerSettings {
            name: "a".to_string(),
            address: "10.0.0.1".to_string(),
            port: 1,
        });
        let mut app = App::new(settings, &client);
        let spawner = TaskSpawner::new(Arc::new(client), tx);
        let handler = EventHandler::new();

        let action = app.handle_enter();
        round_trip(&spawner, &mut rx, &mut app, action).await;
        assert_eq!(app.user_list.rows().len(), 3);

        handler.handle_key(&mut app, key(KeyCode::Char(' ')));
        handler.handle_key(&mut app, key(KeyCode::Char('x')));
        let action = handler.handle_key(&mut app, key(KeyCode::Enter));
        let refresh = round_trip(&spawner, &mut rx, &mut app, action).await;
        round_trip(&spawner, &mut rx, &mut app, refresh).await;

        assert_eq!(app.user_list.rows().len(), 2);
    }
}
