//! Monitor client error types

use thiserror::Error;

/// Errors reported by a monitor client or one of its server handles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// The remote server could not be reached
    #[error("Connection to {address}:{port} failed: {reason}")]
    Connection {
        address: String,
        port: u16,
        reason: String,
    },

    /// The remote server refused the request
    #[error("Request rejected by server: {0}")]
    Rejected(String),

    /// The remote server answered with something unexpected
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Type alias for monitor client results
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = MonitorError::Connection {
            address: "10.0.0.1".to_string(),
            port: 1234,
            reason: "timed out".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("10.0.0.1:1234"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn test_rejected_error_display() {
        let err = MonitorError::Rejected("not authorized".to_string());
        assert_eq!(err.to_string(), "Request rejected by server: not authorized");
    }
}
