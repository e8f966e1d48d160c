//! Records exchanged with the monitor client
//!
//! `MonitorUser` mirrors the columns the console shows for one connection on
//! a remote server. `ValidationOutcome` is the typed result of asking a
//! server handle whether it points at a live monitored server.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// One user connection reported by a monitored server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorUser {
    /// Login name of the user
    pub username: String,
    /// Machine the user connects from
    pub computer_name: String,
    /// Server-side thread serving this connection
    pub thread_id: u64,
    /// User name as seen by the server process
    pub server: String,
    /// Program (main routine) the user is running
    pub main_name: String,
    /// Environment the user is connected to
    pub environment: String,
    /// When the connection was established
    pub login_time: String,
    /// Time spent connected
    pub elapsed_time: String,
    /// Instructions executed so far
    pub total_instructions: u64,
    /// Instructions executed per second
    pub instructions_per_second: u64,
    /// Free-form remarks attached by the server
    #[serde(default)]
    pub remarks: String,
    /// Memory used by the connection, in bytes
    pub memory: u64,
    /// Session id
    pub sid: String,
    /// Repository object the program runs from
    pub rpo: String,
    /// Time since the last activity
    pub inactivity_time: String,
    /// Kind of connection (remote, job, ...)
    pub connection_type: String,
}

/// Result of validating a freshly created server handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The server answered and is a monitored server
    Valid,
    /// The server answered but refused validation
    Invalid,
    /// The validation call itself failed
    Failed(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

impl From<Result<bool>> for ValidationOutcome {
    fn from(result: Result<bool>) -> Self {
        match result {
            Ok(true) => ValidationOutcome::Valid,
            Ok(false) => ValidationOutcome::Invalid,
            Err(e) => ValidationOutcome::Failed(e.to_string()),
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationOutcome::Valid => write!(f, "valid"),
            ValidationOutcome::Invalid => write!(f, "invalid"),
            ValidationOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}
