//! # mirage
//!
//! Server binary — wires settings, the Anthropic backend, and the HTTP/
//! WebSocket server together, then runs until ctrl-c.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mirage_llm::{AnthropicBackend, AnthropicConfig};
use mirage_server::{MirageServer, ServerConfig, metrics};
use mirage_settings::MirageSettings;

/// Mirage server.
#[derive(Parser, Debug)]
#[command(name = "mirage", about = "Serve a web application imagined on demand")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings; 0 auto-assigns).
    #[arg(long)]
    port: Option<u16>,

    /// Path to a static shell document served on `/`.
    #[arg(long)]
    index: Option<PathBuf>,

    /// Concurrent model calls allowed in flight (overrides settings).
    #[arg(long)]
    workers: Option<usize>,

    /// Settings file (defaults to `~/.mirage/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Merge CLI overrides over loaded settings into a server config.
fn server_config(cli: &Cli, settings: &MirageSettings) -> ServerConfig {
    ServerConfig {
        host: cli.host.clone().unwrap_or_else(|| settings.server.host.clone()),
        port: cli.port.unwrap_or(settings.server.port),
        max_connections: settings.server.max_connections,
        heartbeat_interval_secs: settings.server.heartbeat_interval_ms / 1000,
        heartbeat_timeout_secs: settings.server.heartbeat_timeout_ms / 1000,
        gateway_workers: cli.workers.unwrap_or(settings.gateway.max_concurrent_calls),
        index_path: cli
            .index
            .clone()
            .or_else(|| settings.server.index_path.clone().map(PathBuf::from)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(mirage_settings::settings_path);
    let settings = mirage_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;

    // MIRAGE_LOG takes precedence over the settings log level.
    let filter = EnvFilter::try_from_env("MIRAGE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.as_filter_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .context("ANTHROPIC_API_KEY must be set (views are generated by the model)")?;

    let backend = Arc::new(AnthropicBackend::new(AnthropicConfig {
        model: settings.model.model.clone(),
        api_key,
        max_tokens: settings.model.max_tokens,
        base_url: settings.model.base_url.clone(),
    }));

    let config = server_config(&args, &settings);
    let metrics_handle = metrics::install_recorder();
    let server = MirageServer::new(config, backend, metrics_handle);

    let (addr, handle) = server.listen().await.context("failed to bind server")?;
    tracing::info!(
        model = settings.model.model.as_str(),
        workers = server.config().gateway_workers,
        "mirage listening on http://{addr}"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down...");
    server.shutdown().shutdown();
    let _ = handle.await;

    tracing::info!("shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_settings_values() {
        let cli = Cli::parse_from(["mirage"]);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.workers.is_none());

        let config = server_config(&cli, &MirageSettings::default());
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.gateway_workers, 10);
        assert_eq!(config.heartbeat_interval_secs, 30);
    }

    #[test]
    fn cli_host_and_port_override() {
        let cli = Cli::parse_from(["mirage", "--host", "127.0.0.1", "--port", "9000"]);
        let config = server_config(&cli, &MirageSettings::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn cli_workers_override() {
        let cli = Cli::parse_from(["mirage", "--workers", "3"]);
        let config = server_config(&cli, &MirageSettings::default());
        assert_eq!(config.gateway_workers, 3);
    }

    #[test]
    fn cli_index_path() {
        let cli = Cli::parse_from(["mirage", "--index", "/srv/index.html"]);
        let config = server_config(&cli, &MirageSettings::default());
        assert_eq!(config.index_path, Some(PathBuf::from("/srv/index.html")));
    }

    #[test]
    fn settings_index_path_used_without_cli_flag() {
        let cli = Cli::parse_from(["mirage"]);
        let mut settings = MirageSettings::default();
        settings.server.index_path = Some("/opt/shell.html".into());
        let config = server_config(&cli, &settings);
        assert_eq!(config.index_path, Some(PathBuf::from("/opt/shell.html")));
    }

    #[test]
    fn settings_flag_parses() {
        let cli = Cli::parse_from(["mirage", "--settings", "/tmp/s.json"]);
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/s.json")));
    }
}
