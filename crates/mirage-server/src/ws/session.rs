//! WebSocket connection loop — owns one session from upgrade to disconnect.
//!
//! One cooperative task per connection. Events are processed strictly in
//! arrival order: the loop does not read frame N+1 until frame N's model
//! exchange has completed and its view event is queued, because the
//! transcript must reflect exchange N before prompt N+1 is built.
//!
//! Whatever path ends the loop — clean close, transport error, model
//! failure — the session is removed from the registry exactly once on the
//! way out. An in-flight model call is never cancelled by closure; it
//! finishes against the (now detached) session and its result is dropped
//! with the send channel.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use mirage_core::{ClientEvent, ConnectionId};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::metrics::{SESSIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL};
use crate::server::AppState;

use super::handler;

/// Tracks when a client last showed any sign of life.
struct ConnectionHealth {
    last_seen: Mutex<Instant>,
}

impl ConnectionHealth {
    fn new() -> Self {
        Self {
            last_seen: Mutex::new(Instant::now()),
        }
    }

    fn mark_alive(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    fn silent_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }
}

/// Run a WebSocket session for a connected client.
///
/// 1. Allocates a fresh session in the registry
/// 2. Dispatches incoming events through the session state machine
/// 3. Forwards view events via the send channel, with periodic Pings
/// 4. Removes the session on disconnect, error, or unresponsiveness
#[instrument(skip_all, fields(connection_id))]
pub async fn run_ws_session(ws: WebSocket, state: AppState) {
    let session = state.registry.create();
    let connection_id = ConnectionId::generate();
    let _ = tracing::Span::current().record("connection_id", connection_id.as_str());

    info!(session_id = %session.id(), "client connected");
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(SESSIONS_ACTIVE).increment(1.0);

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (send_tx, mut send_rx) = mpsc::channel::<String>(64);
    let health = Arc::new(ConnectionHealth::new());

    // Outbound forwarder with periodic Ping frames.
    let ping_interval = Duration::from_secs(state.config.heartbeat_interval_secs);
    let pong_timeout = Duration::from_secs(state.config.heartbeat_timeout_secs);
    let outbound_health = health.clone();
    let outbound = tokio::spawn(async move {
        let mut ping = tokio::time::interval(ping_interval);
        // Skip the immediate first tick
        let _ = ping.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    if outbound_health.silent_for() > pong_timeout {
                        warn!("client unresponsive for {pong_timeout:?}, stopping outbound");
                        break;
                    }
                    if ws_tx.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Inbound loop: CONNECTED → (init) READY → (interaction) READY → CLOSED.
    while let Some(Ok(msg)) = ws_rx.next().await {
        let text = match msg {
            Message::Text(ref t) => t.to_string(),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => s.to_owned(),
                Err(_) => {
                    debug!(len = data.len(), "ignoring non-UTF8 binary frame");
                    continue;
                }
            },
            Message::Close(_) => {
                info!("client sent close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                health.mark_alive();
                continue;
            }
        };
        health.mark_alive();

        // A frame that is not JSON at all is a protocol error: close.
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "invalid JSON frame, closing connection");
                break;
            }
        };

        // Valid JSON with an unknown or missing type: log and skip.
        let event: ClientEvent = match serde_json::from_value(value) {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "unrecognized client event, skipping");
                continue;
            }
        };

        match handler::handle_event(event, &session, &state.gateway).await {
            Ok(view) => {
                let json = match serde_json::to_string(&view) {
                    Ok(j) => j,
                    Err(e) => {
                        error!(error = %e, "failed to serialize view event");
                        break;
                    }
                };
                if send_tx.send(json).await.is_err() {
                    // Outbound task is gone; nothing left to deliver to.
                    break;
                }
            }
            Err(err) => {
                error!(
                    category = err.category(),
                    error = %err,
                    "model invocation failed, closing connection"
                );
                break;
            }
        }
    }

    info!(session_id = %session.id(), "client disconnected");
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(SESSIONS_ACTIVE).decrement(1.0);
    outbound.abort();
    state.registry.remove(session.id());
}
