//! Model invocation gateway.
//!
//! The bridge between connection handlers and the model backend, and the
//! only shared mutable resource in the core: a fixed pool of call permits.
//! A session whose model call is slow holds one permit; every other
//! session's control plane keeps running. When all permits are taken, new
//! calls queue (the caller suspends) rather than fail.
//!
//! No deadline is imposed on a call — a hung backend ties up one permit
//! until it returns.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use mirage_llm::{BackendResult, ModelBackend};
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use crate::metrics::{
    GATEWAY_CALLS_INFLIGHT, GATEWAY_CALLS_TOTAL, GATEWAY_CALL_DURATION_SECONDS,
    GATEWAY_ERRORS_TOTAL,
};
use crate::sanitize::strip_fences;
use crate::session::Session;

/// Bounded-concurrency bridge to the model backend.
pub struct ModelGateway {
    backend: Arc<dyn ModelBackend>,
    limiter: Arc<Semaphore>,
}

impl ModelGateway {
    /// Create a gateway with a fixed number of in-flight call permits.
    pub fn new(backend: Arc<dyn ModelBackend>, max_concurrent_calls: usize) -> Self {
        Self {
            backend,
            limiter: Arc::new(Semaphore::new(max_concurrent_calls)),
        }
    }

    /// The backend's model identifier.
    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Permits currently free (for the health surface and tests).
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }

    /// Run one exchange for a session.
    ///
    /// Appends `prompt` as a `user` message, calls the backend with the full
    /// transcript, appends the raw reply as `assistant`, and returns the
    /// fence-stripped reply. On failure the `user` message stays without a
    /// matching `assistant` entry — the transcript is left asymmetric by
    /// design and the error is the caller's to handle.
    #[instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn invoke(&self, session: &Session, prompt: String) -> BackendResult<String> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .expect("gateway semaphore never closes");

        gauge!(GATEWAY_CALLS_INFLIGHT).increment(1.0);
        let started = Instant::now();

        session.push_user(prompt);
        let transcript = session.snapshot();
        debug!(context_messages = transcript.len(), "dispatching model call");

        let result = self.backend.complete(&transcript).await;

        gauge!(GATEWAY_CALLS_INFLIGHT).decrement(1.0);
        histogram!(GATEWAY_CALL_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        match result {
            Ok(raw) => {
                session.push_assistant(raw.clone());
                counter!(GATEWAY_CALLS_TOTAL).increment(1);
                Ok(strip_fences(&raw))
            }
            Err(err) => {
                counter!(GATEWAY_ERRORS_TOTAL, "category" => err.category()).increment(1);
                Err(err)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
