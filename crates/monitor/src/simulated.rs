//! In-process monitor client
//!
//! `SimulatedClient` answers every call from a table of known hosts kept in
//! memory. It backs the console when no real client library is linked in and
//! gives tests a deterministic collaborator.
//!
//! Hosts are keyed by `address:port`. A host is either reachable (with a user
//! list), refusing validation, or failing every call with a fixed reason.
//! Unknown hosts fail with a connection error unless the client was built
//! with [`SimulatedBuilder::accept_unknown`], in which case they validate and
//! report a small generated user list.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::client::{MonitorClient, MonitorServer};
use crate::error::{MonitorError, Result};
use crate::types::MonitorUser;

/// Behavior of one simulated host
#[derive(Debug, Clone)]
enum HostState {
    Reachable(Vec<MonitorUser>),
    Refusing,
    Failing(String),
}

/// A message recorded by `send_message`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// `address:port` of the server the message went through
    pub server: String,
    /// Recipient user name
    pub username: String,
    pub message: String,
}

#[derive(Debug)]
struct Inner {
    hosts: Mutex<HashMap<String, HostState>>,
    messages: Mutex<Vec<SentMessage>>,
    accept_unknown: bool,
    latency: Duration,
}

/// Builder for [`SimulatedClient`]
#[derive(Debug, Default)]
pub struct SimulatedBuilder {
    hosts: HashMap<String, HostState>,
    accept_unknown: bool,
    latency: Duration,
}

impl SimulatedBuilder {
    /// Register a reachable host with the given connected users
    pub fn with_host(mut self, address: &str, port: u16, users: Vec<MonitorUser>) -> Self {
        self.hosts
            .insert(host_key(address, port), HostState::Reachable(users));
        self
    }

    /// Register a host that answers but refuses validation
    pub fn with_refusing_host(mut self, address: &str, port: u16) -> Self {
        self.hosts.insert(host_key(address, port), HostState::Refusing);
        self
    }

    /// Register a host whose every call fails with `reason`
    pub fn with_failing_host(mut self, address: &str, port: u16, reason: &str) -> Self {
        self.hosts.insert(
            host_key(address, port),
            HostState::Failing(reason.to_string()),
        );
        self
    }

    /// Treat unknown hosts as reachable with generated users
    pub fn accept_unknown(mut self, accept: bool) -> Self {
        self.accept_unknown = accept;
        self
    }

    /// Delay every remote call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> SimulatedClient {
        SimulatedClient {
            inner: Arc::new(Inner {
                hosts: Mutex::new(self.hosts),
                messages: Mutex::new(Vec::new()),
                accept_unknown: self.accept_unknown,
                latency: self.latency,
            }),
        }
    }
}

/// Monitor client answering from an in-memory host table
#[derive(Debug, Clone)]
pub struct SimulatedClient {
    inner: Arc<Inner>,
}

impl SimulatedClient {
    pub fn builder() -> SimulatedBuilder {
        SimulatedBuilder::default()
    }

    /// Client that accepts any host and fabricates its users
    pub fn demo() -> Self {
        Self::builder().accept_unknown(true).build()
    }

    /// Messages delivered so far, oldest first
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.inner.messages.lock().await.clone()
    }

    /// Replace the user list of a reachable host
    pub async fn set_users(&self, address: &str, port: u16, users: Vec<MonitorUser>) {
        self.inner
            .hosts
            .lock()
            .await
            .insert(host_key(address, port), HostState::Reachable(users));
    }
}

impl MonitorClient for SimulatedClient {
    fn create_monitor_server(&self) -> Box<dyn MonitorServer> {
        Box::new(SimulatedServer {
            address: String::new(),
            port: 0,
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Server handle produced by [`SimulatedClient`]
#[derive(Debug)]
pub struct SimulatedServer {
    address: String,
    port: u16,
    inner: Arc<Inner>,
}

impl SimulatedServer {
    fn key(&self) -> String {
        host_key(&self.address, self.port)
    }

    async fn delay(&self) {
        if !self.inner.latency.is_zero() {
            tokio::time::sleep(self.inner.latency).await;
        }
    }

    /// Look up the host, materializing a generated one when unknown hosts are accepted
    async fn host(&self) -> Result<HostState> {
        let mut hosts = self.inner.hosts.lock().await;
        if let Some(state) = hosts.get(&self.key()) {
            return Ok(state.clone());
        }

        if self.inner.accept_unknown {
            let users = generated_users(&self.address, self.port);
            hosts.insert(self.key(), HostState::Reachable(users.clone()));
            return Ok(HostState::Reachable(users));
        }

        Err(MonitorError::Connection {
            address: self.address.clone(),
            port: self.port,
            reason: "host unreachable".to_string(),
        })
    }
}

#[async_trait]
impl MonitorServer for SimulatedServer {
    fn address(&self) -> &str {
        &self.address
    }

    fn set_address(&mut self, address: String) {
        self.address = address;
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    async fn validate(&self) -> Result<bool> {
        self.delay().await;
        debug!("Validating simulated server {}", self.key());

        match self.host().await? {
            HostState::Reachable(_) => Ok(true),
            HostState::Refusing => Ok(false),
            HostState::Failing(reason) => Err(MonitorError::Other(reason)),
        }
    }

    async fn get_users(&self) -> Result<Vec<MonitorUser>> {
        self.delay().await;

        match self.host().await? {
            HostState::Reachable(users) => Ok(users),
            HostState::Refusing => Err(MonitorError::Rejected("not a monitor server".to_string())),
            HostState::Failing(reason) => Err(MonitorError::Other(reason)),
        }
    }

    async fn send_message(&self, users: &[MonitorUser], message: &str) -> Result<()> {
        self.delay().await;

        if let HostState::Failing(reason) = self.host().await? {
            return Err(MonitorError::Other(reason));
        }

        let mut messages = self.inner.messages.lock().await;
        for user in users {
            messages.push(SentMessage {
                server: self.key(),
                username: user.username.clone(),
                message: message.to_string(),
            });
        }

        info!("Sent message to {} user(s) on {}", users.len(), self.key());
        Ok(())
    }

    async fn kill_users(&self, users: &[MonitorUser]) -> Result<()> {
        self.delay().await;

        let mut hosts = self.inner.hosts.lock().await;
        match hosts.get_mut(&self.key()) {
            Some(HostState::Reachable(connected)) => {
                let before = connected.len();
                connected.retain(|c| !users.iter().any(|u| u.thread_id == c.thread_id));
                info!(
                    "Disconnected {} user(s) from {}",
                    before - connected.len(),
                    self.key()
                );
                Ok(())
            }
            Some(HostState::Refusing) => {
                Err(MonitorError::Rejected("not a monitor server".to_string()))
            }
            Some(HostState::Failing(reason)) => Err(MonitorError::Other(reason.clone())),
            None => Err(MonitorError::Connection {
                address: self.address.clone(),
                port: self.port,
                reason: "host unreachable".to_string(),
            }),
        }
    }
}

fn host_key(address: &str, port: u16) -> String {
    format!("{}:{}", address, port)
}

/// Deterministic users for hosts the demo client was never told about
fn generated_users(address: &str, port: u16) -> Vec<MonitorUser> {
    let count = 2 + (port as usize % 4);
    (0..count)
        .map(|i| MonitorUser {
            username: format!("user{:02}", i + 1),
            computer_name: format!("WS-{:03}", i + 10),
            thread_id: u64::from(port) * 100 + i as u64,
            server: format!("user{:02}", i + 1),
            main_name: if i % 2 == 0 { "SIGAFAT" } else { "SIGACOM" }.to_string(),
            environment: address.to_string(),
            login_time: format!("{:02}:{:02}:00", 8 + i, (i * 7) % 60),
            elapsed_time: format!("0{}:15:00", i),
            total_instructions: 10_000 * (i as u64 + 1),
            instructions_per_second: 25 * (i as u64 + 1),
            remarks: String::new(),
            memory: 4 * 1024 * 1024 * (i as u64 + 1),
            sid: format!("sid-{}", i),
            rpo: "default".to_string(),
            inactivity_time: format!("00:0{}:00", i % 10),
            connection_type: if i == 0 { "Job" } else { "Remote" }.to_string(),
        })
        .collect()
}
