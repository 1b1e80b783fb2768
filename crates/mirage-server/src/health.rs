//! `/health` endpoint.

use serde::Serialize;
use std::time::Instant;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Number of live sessions (one per connection).
    pub active_sessions: usize,
    /// Model identifier behind the gateway.
    pub model: String,
}

/// Build a health response from live counters.
pub fn health_check(start_time: Instant, sessions: usize, model: &str) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        active_sessions: sessions,
        model: model.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_ok() {
        let resp = health_check(Instant::now(), 0, "m");
        assert_eq!(resp.status, "ok");
    }

    #[test]
    fn uptime_increases() {
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_secs(60))
            .unwrap();
        let resp = health_check(start, 0, "m");
        assert!(resp.uptime_secs >= 59);
    }

    #[test]
    fn counters_tracked() {
        let resp = health_check(Instant::now(), 3, "claude-haiku-4-5-20251001");
        assert_eq!(resp.active_sessions, 3);
        assert_eq!(resp.model, "claude-haiku-4-5-20251001");
    }

    #[test]
    fn serialization() {
        let resp = health_check(Instant::now(), 2, "m");
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&resp).unwrap()).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["active_sessions"], 2);
        assert!(parsed["uptime_secs"].is_number());
        assert_eq!(parsed["model"], "m");
    }
}
