//! Settings sections and their compiled defaults.

use serde::{Deserialize, Serialize};

/// Root settings document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirageSettings {
    /// Settings schema version.
    pub version: String,
    /// Product name (used in logs).
    pub name: String,
    /// Network and connection settings.
    pub server: ServerSettings,
    /// Model backend settings.
    pub model: ModelSettings,
    /// Model-call gateway settings.
    pub gateway: GatewaySettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for MirageSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "mirage".to_string(),
            server: ServerSettings::default(),
            model: ModelSettings::default(),
            gateway: GatewaySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Network and connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port (`0` auto-assigns, useful in tests).
    pub port: u16,
    /// Maximum concurrent WebSocket connections.
    pub max_connections: usize,
    /// WebSocket heartbeat (Ping) interval in milliseconds.
    pub heartbeat_interval_ms: u64,
    /// Close a connection after this long without a Pong, in milliseconds.
    pub heartbeat_timeout_ms: u64,
    /// Optional path to the static shell document served on `GET /`.
    /// When unset, a compiled-in shell is served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_connections: 50,
            heartbeat_interval_ms: 30_000,
            heartbeat_timeout_ms: 90_000,
            index_path: None,
        }
    }
}

/// Model backend settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelSettings {
    /// Model identifier sent to the Messages API.
    pub model: String,
    /// Maximum tokens the model may generate per reply.
    pub max_tokens: u32,
    /// Override for the API base URL (tests, proxies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "claude-haiku-4-5-20251001".to_string(),
            max_tokens: 4096,
            base_url: None,
        }
    }
}

/// Model-call gateway settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewaySettings {
    /// Fixed number of model calls allowed in flight at once, across all
    /// sessions. A resource limit, not a correctness parameter: callers
    /// past the limit queue rather than fail.
    pub max_concurrent_calls: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 10,
        }
    }
}

/// Minimum log level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace-level (most verbose).
    Trace,
    /// Debug-level.
    Debug,
    /// Info-level (default).
    #[default]
    Info,
    /// Warning-level.
    Warn,
    /// Error-level.
    Error,
}

impl LogLevel {
    /// Convert to a tracing filter string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level emitted to stderr.
    pub level: LogLevel,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_defaults() {
        let s = MirageSettings::default();
        assert_eq!(s.version, "0.1.0");
        assert_eq!(s.name, "mirage");
        assert_eq!(s.server.port, 8000);
        assert_eq!(s.model.max_tokens, 4096);
        assert_eq!(s.gateway.max_concurrent_calls, 10);
        assert_eq!(s.logging.level, LogLevel::Info);
    }

    #[test]
    fn server_defaults() {
        let s = ServerSettings::default();
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.max_connections, 50);
        assert_eq!(s.heartbeat_interval_ms, 30_000);
        assert_eq!(s.heartbeat_timeout_ms, 90_000);
        assert!(s.index_path.is_none());
    }

    #[test]
    fn serde_camel_case() {
        let json = serde_json::to_value(MirageSettings::default()).unwrap();
        assert!(json["server"].get("maxConnections").is_some());
        assert!(json["server"].get("heartbeatIntervalMs").is_some());
        assert!(json["model"].get("maxTokens").is_some());
        assert!(json["gateway"].get("maxConcurrentCalls").is_some());
    }

    #[test]
    fn none_fields_omitted() {
        let json = serde_json::to_value(MirageSettings::default()).unwrap();
        assert!(json["server"].get("indexPath").is_none());
        assert!(json["model"].get("baseUrl").is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s: MirageSettings = serde_json::from_value(serde_json::json!({
            "server": {"port": 9000},
            "model": {"model": "claude-sonnet-4-5-20250929"}
        }))
        .unwrap();
        assert_eq!(s.server.port, 9000);
        assert_eq!(s.server.host, "0.0.0.0");
        assert_eq!(s.model.model, "claude-sonnet-4-5-20250929");
        assert_eq!(s.model.max_tokens, 4096);
    }

    #[test]
    fn log_level_serde() {
        for (level, expected) in [
            (LogLevel::Trace, "\"trace\""),
            (LogLevel::Debug, "\"debug\""),
            (LogLevel::Info, "\"info\""),
            (LogLevel::Warn, "\"warn\""),
            (LogLevel::Error, "\"error\""),
        ] {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, expected);
            let back: LogLevel = serde_json::from_str(&json).unwrap();
            assert_eq!(back, level);
        }
    }

    #[test]
    fn log_level_filter_strings() {
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
        assert_eq!(LogLevel::Error.as_filter_str(), "error");
    }
}
