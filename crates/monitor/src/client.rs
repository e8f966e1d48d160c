//! Traits the console calls through
//!
//! A `MonitorClient` is a factory for server handles. A handle is configured
//! with an address and port while it is still exclusively owned, then frozen
//! behind an `Arc` and shared between the UI and the tasks that call it.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{MonitorUser, ValidationOutcome};

/// Handle to one remote monitored server
#[async_trait]
pub trait MonitorServer: Send + Sync + fmt::Debug {
    /// Address the handle points at
    fn address(&self) -> &str;

    fn set_address(&mut self, address: String);

    /// Port the handle points at
    fn port(&self) -> u16;

    fn set_port(&mut self, port: u16);

    /// Check that the address and port reach a monitored server
    async fn validate(&self) -> Result<bool>;

    /// Fetch the users currently connected to the server
    async fn get_users(&self) -> Result<Vec<MonitorUser>>;

    /// Deliver a text message to each of the given users
    async fn send_message(&self, users: &[MonitorUser], message: &str) -> Result<()>;

    /// Drop the connections of the given users
    async fn kill_users(&self, users: &[MonitorUser]) -> Result<()>;
}

/// A server handle after configuration, shared between UI and tasks
pub type SharedServer = Arc<dyn MonitorServer>;

/// Factory for server handles
pub trait MonitorClient: Send + Sync {
    /// Create an unconfigured server handle
    fn create_monitor_server(&self) -> Box<dyn MonitorServer>;
}

/// Run `validate` and fold its result into a `ValidationOutcome`
pub async fn validate_server(server: &dyn MonitorServer) -> ValidationOutcome {
    ValidationOutcome::from(server.validate().await)
}
