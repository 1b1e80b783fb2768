//! Prometheus metrics recorder and metric name constants.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Must be called once at server startup before any metrics are recorded.
pub fn install_recorder() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install metrics recorder");
    info!("prometheus metrics recorder installed");
    handle
}

// Metric name constants to avoid typos across modules.

/// WebSocket connections opened total (counter).
pub const WS_CONNECTIONS_TOTAL: &str = "ws_connections_total";
/// WebSocket disconnections total (counter).
pub const WS_DISCONNECTIONS_TOTAL: &str = "ws_disconnections_total";
/// Live sessions (gauge).
pub const SESSIONS_ACTIVE: &str = "sessions_active";
/// Model gateway calls total (counter).
pub const GATEWAY_CALLS_TOTAL: &str = "gateway_calls_total";
/// Model gateway call failures total (counter, labels: category).
pub const GATEWAY_ERRORS_TOTAL: &str = "gateway_errors_total";
/// Model gateway calls currently in flight (gauge).
pub const GATEWAY_CALLS_INFLIGHT: &str = "gateway_calls_inflight";
/// Model gateway call duration in seconds (histogram).
pub const GATEWAY_CALL_DURATION_SECONDS: &str = "gateway_call_duration_seconds";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_render_without_global_install() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let output = handle.render();
        assert!(output.is_empty() || output.contains('\n') || output.contains('#'));
    }

    #[test]
    fn metric_names_are_snake_case() {
        for name in [
            WS_CONNECTIONS_TOTAL,
            WS_DISCONNECTIONS_TOTAL,
            SESSIONS_ACTIVE,
            GATEWAY_CALLS_TOTAL,
            GATEWAY_ERRORS_TOTAL,
            GATEWAY_CALLS_INFLIGHT,
            GATEWAY_CALL_DURATION_SECONDS,
        ] {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
