//! Test utilities for monitor-console
//!
//! Provides fixture builders and helper functions for testing across crates.
//!
//! # Example
//!
//! ```
//! use common::test_utils::create_mock_user;
//!
//! let user = create_mock_user(7);
//! assert_eq!(user.thread_id, 7);
//! ```

use monitor::MonitorUser;
use std::future::Future;
use std::time::Duration;

/// Default test timeout (5 seconds)
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a mock MonitorUser for testing
///
/// The user name and machine are derived from `thread_id`, so two users
/// built from different ids never compare equal.
pub fn create_mock_user(thread_id: u64) -> MonitorUser {
    MonitorUser {
        username: format!("user{}", thread_id),
        computer_name: format!("WS-{:03}", thread_id),
        thread_id,
        server: format!("user{}", thread_id),
        main_name: "SIGAFAT".to_string(),
        environment: "production".to_string(),
        login_time: "08:00:00".to_string(),
        elapsed_time: "01:00:00".to_string(),
        total_instructions: thread_id * 1_000,
        instructions_per_second: thread_id * 10,
        remarks: String::new(),
        memory: 1024 * 1024,
        sid: format!("sid-{}", thread_id),
        rpo: "default".to_string(),
        inactivity_time: "00:00:30".to_string(),
        connection_type: "Remote".to_string(),
    }
}

/// Create a list of mock users with thread ids `1..=count`
pub fn create_mock_user_list(count: u64) -> Vec<MonitorUser> {
    (1..=count).map(create_mock_user).collect()
}

/// Run an async test operation with a timeout
///
/// # Example
/// ```ignore
/// use common::test_utils::{with_timeout, DEFAULT_TEST_TIMEOUT};
///
/// #[tokio::test]
/// async fn test_with_timeout() {
///     let result = with_timeout(DEFAULT_TEST_TIMEOUT, async { 42 }).await.unwrap();
///     assert_eq!(result, 42);
/// }
/// ```
pub async fn with_timeout<T, F>(duration: Duration, future: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| TimeoutError { duration })
}

/// Error returned when a test times out
#[derive(Debug)]
pub struct TimeoutError {
    /// The timeout duration that was exceeded
    pub duration: Duration,
}

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Test timed out after {:?}", self.duration)
    }
}

impl std::error::Error for TimeoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_users_are_distinct() {
        let users = create_mock_user_list(3);
        assert_eq!(users.len(), 3);
        assert_ne!(users[0], users[1]);
        assert_eq!(users[2].thread_id, 3);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        })
        .await;
        assert!(result.is_err());
    }
}
