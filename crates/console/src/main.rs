//! Monitor Console
//!
//! Terminal console for registering monitored servers, listing the users
//! connected to them, and messaging or disconnecting those users.

mod config;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use common::logging::default_log_dir;
use common::setup_logging;
use monitor::{MonitorClient, SimulatedClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use config::ConsoleConfig;

#[derive(Parser, Debug)]
#[command(name = "monitor-console")]
#[command(author, version, about = "Monitor Console - Manage users of monitored servers")]
#[command(long_about = "
Terminal console for monitored application servers. Register servers by
name, address and port, browse the users connected to each one, and send
messages to or disconnect selected users.

EXAMPLES:
    # Run with default config
    monitor-console

    # Run with custom config
    monitor-console --config /path/to/console.toml

    # Run with debug logging (written to the log directory)
    monitor-console --log-level debug

CONFIGURATION:
    The console looks for its settings in the following order:
    1. Path specified with --config
    2. ~/.config/monitor-console/console.toml
    3. Built-in defaults when no settings file exists (an invalid file is an error)

    Servers added from the UI are written back to the same file.
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Simulated round-trip time of every remote call, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 800)]
    latency_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = ConsoleConfig::default();
        let path = ConsoleConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    // Load configuration first (to get log level from config if not specified)
    let (config, settings_path) = if let Some(ref path) = args.config {
        let config =
            ConsoleConfig::load(Some(path.clone())).context("Failed to load configuration")?;
        (config, path.clone())
    } else {
        let config = ConsoleConfig::load_or_default().context("Failed to load configuration")?;
        (config, ConsoleConfig::default_path())
    };

    // Use CLI log level if specified, otherwise use config value
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.console.log_level);

    // The terminal belongs to the TUI, so logs go to a file
    let log_dir = config.log_dir().unwrap_or_else(default_log_dir);
    let _log_guard = setup_logging(log_level, &log_dir).context("Failed to setup logging")?;

    info!("Monitor Console v{}", env!("CARGO_PKG_VERSION"));
    info!("Log level: {}", log_level);
    info!("Settings file: {}", settings_path.display());

    let client: Arc<dyn MonitorClient> = Arc::new(
        SimulatedClient::builder()
            .accept_unknown(true)
            .with_latency(Duration::from_millis(args.latency_ms))
            .build(),
    );

    let result = tui::run(client, config, settings_path).await;

    info!("Console shutting down...");
    result
}
