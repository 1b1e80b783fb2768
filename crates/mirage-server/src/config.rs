//! Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the Mirage server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Maximum concurrent WebSocket connections; upgrades past the limit
    /// are refused with 503.
    pub max_connections: usize,
    /// Heartbeat (Ping) interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Close a connection after this long without any sign of life.
    pub heartbeat_timeout_secs: u64,
    /// Concurrent model calls allowed in flight across all sessions.
    pub gateway_workers: usize,
    /// Optional path to the static shell served on `GET /`. Falls back to
    /// the compiled-in shell when unset or unreadable.
    pub index_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            max_connections: 50,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 90,
            gateway_workers: 10,
            index_path: None,
        }
    }
}
