//! Monitor client contract for monitor-console
//!
//! This crate defines what the console needs from the library that talks to
//! remote monitored servers: the user records it returns, the traits the UI
//! calls through, and the typed outcome of a server validation.
//!
//! The console never owns a concrete client. It receives an
//! `Arc<dyn MonitorClient>` at construction time and creates server handles
//! through it.
//!
//! # Example
//!
//! ```
//! use monitor::{MonitorClient, SimulatedClient, ValidationOutcome};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let client = SimulatedClient::builder()
//!     .with_host("10.0.0.1", 1234, Vec::new())
//!     .build();
//!
//! let mut server = client.create_monitor_server();
//! server.set_address("10.0.0.1".to_string());
//! server.set_port(1234);
//!
//! let outcome = ValidationOutcome::from(server.validate().await);
//! assert_eq!(outcome, ValidationOutcome::Valid);
//! # }
//! ```

pub mod client;
pub mod error;
pub mod simulated;
pub mod types;

pub use client::{MonitorClient, MonitorServer, SharedServer, validate_server};
pub use error::{MonitorError, Result};
pub use simulated::{SentMessage, SimulatedBuilder, SimulatedClient};
pub use types::{MonitorUser, ValidationOutcome};
