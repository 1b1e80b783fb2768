//! Event dispatch — turns one client event into one view event.
//!
//! This is the session state machine's transition function, kept free of
//! socket plumbing so it can be exercised directly. The connection loop in
//! [`super::session`] feeds it parsed events in arrival order and ships the
//! returned view events back to the client.

use mirage_core::constants::NO_CHANGE;
use mirage_core::{ClientEvent, ServerEvent};
use mirage_llm::BackendResult;
use tracing::{debug, info};

use crate::gateway::ModelGateway;
use crate::prompt::{build_init_prompt, build_interaction_prompt};
use crate::session::Session;

/// Process one client event against a session, producing the view event to
/// send back.
///
/// - `init` replaces the description, resets the transcript, and renders
///   the initial screen. The reply is always delivered as `html`, even
///   when empty.
/// - `interaction` renders the follow-up view, or `no_change` when the
///   sanitized reply is exactly the sentinel.
///
/// A backend error propagates with the transcript already holding the
/// unanswered `user` entry; the caller decides connection-level handling.
pub async fn handle_event(
    event: ClientEvent,
    session: &Session,
    gateway: &ModelGateway,
) -> BackendResult<ServerEvent> {
    match event {
        ClientEvent::Init { description } => {
            info!(session_id = %session.id(), "initializing application: {description}");
            session.set_description(&description);
            session.reset_transcript();

            let prompt = build_init_prompt(&description);
            let reply = gateway.invoke(session, prompt).await?;
            Ok(ServerEvent::Html { content: reply })
        }
        ClientEvent::Interaction {
            element_id,
            form_data,
        } => {
            info!(session_id = %session.id(), element_id, "processing interaction");
            if !form_data.is_empty() {
                debug!(fields = form_data.len(), "form data attached");
            }

            let prompt = build_interaction_prompt(&element_id, &form_data);
            let reply = gateway.invoke(session, prompt).await?;
            Ok(classify_reply(reply))
        }
    }
}

/// Decide whether a sanitized reply redraws the view or leaves it alone.
#[must_use]
pub fn classify_reply(reply: String) -> ServerEvent {
    if reply.trim() == NO_CHANGE {
        ServerEvent::NoChange
    } else {
        ServerEvent::Html { content: reply }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
