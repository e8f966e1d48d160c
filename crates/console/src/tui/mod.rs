//! Terminal User Interface
//!
//! Provides an interactive TUI for browsing the users connected to
//! monitored servers and acting on them.
//!
//! # Layout
//!
//! The TUI is organized in three main sections:
//! - **Top Panel**: Status bar with the bound server and the last status message
//! - **Center Panel**: Two-pane view with servers (left) and users (right)
//! - **Bottom Panel**: Help bar with context-sensitive keybindings
//!
//! # Keybindings
//!
//! - `Tab`: Switch between server and user pane
//! - `j/k` or arrow keys: Navigate lists
//! - `Enter`: Show users of a server / Check the user under the cursor
//! - `Space`: Check the user under the cursor
//! - `A`: Check or uncheck all users
//! - `m`: Send a message to the checked users
//! - `x`: Disconnect the checked users
//! - `r`: Refresh user list
//! - `a`: Add a server
//! - `q`: Quit (with confirmation)
//! - `?`: Show help

pub mod app;
pub mod dialogs;
pub mod events;
pub mod tasks;
pub mod ui;
pub mod user_list;
pub mod widgets;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use monitor::{MonitorClient, MonitorError, MonitorUser, SharedServer, ValidationOutcome};

use crate::config::ConsoleConfig;
use dialogs::ServerRequest;

pub use app::{App, AppAction};
pub use events::EventHandler;
pub use tasks::TaskSpawner;

/// Messages sent from async tasks to the TUI
#[derive(Debug)]
pub enum TuiMessage {
    /// Validation of a new server finished
    ServerValidated {
        request: ServerRequest,
        server: SharedServer,
        outcome: ValidationOutcome,
    },
    /// A user fetch finished
    UsersFetched {
        generation: u64,
        result: Result<Vec<MonitorUser>, MonitorError>,
    },
    /// A send-message or disconnect operation finished
    BulkFinished {
        description: String,
        result: Result<(), MonitorError>,
    },
}

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    app: App,
    /// Event handler
    event_handler: EventHandler,
    /// Spawns remote calls
    tasks: TaskSpawner,
    /// Where settings are written after a change
    settings_path: PathBuf,
    /// Channel for receiving messages from async tasks
    message_rx: mpsc::Receiver<TuiMessage>,
}

impl TuiRunner {
    /// Create a new TUI runner
    pub fn new(
        client: Arc<dyn MonitorClient>,
        settings: ConsoleConfig,
        settings_path: PathBuf,
    ) -> Result<Self> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;

        // Create message channel
        let (message_tx, message_rx) = mpsc::channel(100);

        let app = App::new(settings, client.as_ref());
        info!("Loaded {} registered server(s)", app.servers.len());

        Ok(Self {
            terminal,
            app,
            event_handler: EventHandler::new(),
            tasks: TaskSpawner::new(client, message_tx),
            settings_path,
            message_rx,
        })
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI");

        // Initial render
        self.terminal.draw(|f| ui::render(f, &self.app))?;

        loop {
            // Process any pending messages from async tasks
            while let Ok(msg) = self.message_rx.try_recv() {
                let action = self.app.handle_message(msg);
                self.handle_action(action);
            }

            // Poll for terminal events
            match self.event_handler.poll()? {
                Some(Event::Key(key)) => {
                    let action = self.event_handler.handle_key(&mut self.app, key);
                    self.handle_action(action);
                }
                // Terminal will re-render on next draw
                Some(_) => {}
                None => self.app.on_tick(),
            }

            // Check if we should quit
            if self.app.should_quit {
                break;
            }

            // Render
            self.terminal.draw(|f| ui::render(f, &self.app))?;
        }

        info!("TUI shutting down");
        Ok(())
    }

    /// Handle an application action
    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::None => {}
            AppAction::Quit => {
                // Cleanup will happen in the caller
                self.app.should_quit = true;
            }
            AppAction::ValidateServer(request) => self.tasks.spawn_validate_server(request),
            AppAction::FetchUsers(request) => self.tasks.spawn_fetch_users(request),
            AppAction::Bulk(action) => self.tasks.spawn_bulk(action),
            AppAction::SaveSettings => {
                if let Err(e) = self.app.settings.save(&self.settings_path) {
                    error!("Failed to save settings: {:#}", e);
                    self.app.set_status(format!("Failed to save settings: {}", e));
                }
            }
        }
    }
}

impl Drop for TuiRunner {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the TUI application
///
/// This is the main entry point for TUI mode. It creates a TuiRunner
/// and runs the main event loop.
///
/// # Arguments
/// * `client` - Factory for monitored server handles
/// * `settings` - Settings holding the registered servers
/// * `settings_path` - File the settings are written back to
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use console::config::ConsoleConfig;
/// use console::tui::run;
/// use monitor::SimulatedClient;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Arc::new(SimulatedClient::demo());
///     let settings = ConsoleConfig::default();
///     run(client, settings, ConsoleConfig::default_path()).await
/// }
/// ```
pub async fn run(
    client: Arc<dyn MonitorClient>,
    settings: ConsoleConfig,
    settings_path: PathBuf,
) -> Result<()> {
    let mut runner = TuiRunner::new(client, settings, settings_path)?;
    runner.run().await
}
