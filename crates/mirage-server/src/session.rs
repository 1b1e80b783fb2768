//! Sessions and the session registry.
//!
//! A [`Session`] is the state behind one logical client connection: an
//! application description and a conversation transcript. It is driven
//! exclusively by its owning connection task, so the mutexes here guard
//! only the brief append/snapshot windows — they are never held across an
//! `.await`.
//!
//! The [`SessionRegistry`] owns creation and teardown. Entries are
//! independent; removal is idempotent so connection cleanup can run
//! unconditionally on any exit path.

use std::sync::Arc;

use dashmap::DashMap;
use mirage_core::{ChatMessage, SessionId, Transcript};
use parking_lot::Mutex;
use tracing::debug;

/// State for one logical client connection.
pub struct Session {
    id: SessionId,
    description: Mutex<String>,
    transcript: Mutex<Transcript>,
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            description: Mutex::new(String::new()),
            transcript: Mutex::new(Transcript::new()),
        }
    }

    /// The session's opaque token.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Current application description.
    pub fn description(&self) -> String {
        self.description.lock().clone()
    }

    /// Replace the application description (each `init` event does this).
    pub fn set_description(&self, description: impl Into<String>) {
        *self.description.lock() = description.into();
    }

    /// Clear the transcript. Runs exactly when an `init` event is processed.
    pub fn reset_transcript(&self) {
        self.transcript.lock().reset();
    }

    /// Append a `user` message to the transcript.
    pub fn push_user(&self, text: impl Into<String>) {
        self.transcript.lock().append_user(text);
    }

    /// Append an `assistant` message to the transcript.
    pub fn push_assistant(&self, text: impl Into<String>) {
        self.transcript.lock().append_assistant(text);
    }

    /// Clone the transcript's messages for a model call.
    ///
    /// The clone decouples the backend call from the session lock.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.transcript.lock().messages().to_vec()
    }

    /// Number of transcript messages.
    pub fn transcript_len(&self) -> usize {
        self.transcript.lock().len()
    }
}

/// Owner of all live sessions, keyed by their opaque tokens.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh session with a generated token and store it.
    pub fn create(&self) -> Arc<Session> {
        let id = SessionId::generate();
        let session = Arc::new(Session::new(id.clone()));
        let _ = self.sessions.insert(id.clone(), session.clone());
        debug!(session_id = %id, "session created");
        session
    }

    /// Look up a live session.
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    /// Remove a session. Removing an absent id is a no-op, never an error.
    pub fn remove(&self, id: &SessionId) {
        if self.sessions.remove(id).is_some() {
            debug!(session_id = %id, "session removed");
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mirage_core::Role;

    // -- session --

    #[test]
    fn new_session_is_blank() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        assert!(session.description().is_empty());
        assert_eq!(session.transcript_len(), 0);
    }

    #[test]
    fn description_is_replaceable() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        session.set_description("a counter app");
        assert_eq!(session.description(), "a counter app");
        session.set_description("a todo list");
        assert_eq!(session.description(), "a todo list");
    }

    #[test]
    fn transcript_appends_in_order() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        session.push_user("prompt");
        session.push_assistant("reply");
        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, Role::User);
        assert_eq!(snapshot[1].role, Role::Assistant);
    }

    #[test]
    fn reset_clears_transcript_but_not_identity() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        let id = session.id().clone();
        session.push_user("old context");
        session.reset_transcript();
        assert_eq!(session.transcript_len(), 0);
        assert_eq!(session.id(), &id);
    }

    #[test]
    fn snapshot_is_detached() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        session.push_user("one");
        let snapshot = session.snapshot();
        session.push_user("two");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.transcript_len(), 2);
    }

    // -- registry --

    #[test]
    fn create_stores_and_get_finds() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        let found = registry.get(session.id()).expect("session should exist");
        assert_eq!(found.id(), session.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_are_unique_per_create() {
        let registry = SessionRegistry::new();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_deletes_entry() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        registry.remove(session.id());
        assert!(registry.get(session.id()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = SessionRegistry::new();
        let session = registry.create();
        let id = session.id().clone();
        registry.remove(&id);
        registry.remove(&id);
        registry.remove(&SessionId::from("never-existed"));
        assert!(registry.is_empty());
    }

    #[test]
    fn sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.create();
        let b = registry.create();

        a.set_description("a chess board");
        b.set_description("a weather dashboard");
        a.push_user("render chess");
        a.push_assistant("<div>chess</div>");
        b.push_user("render weather");

        assert_eq!(a.transcript_len(), 2);
        assert_eq!(b.transcript_len(), 1);
        assert!(a.snapshot().iter().all(|m| !m.content.contains("weather")));
        assert!(b.snapshot().iter().all(|m| !m.content.contains("chess")));
        assert_eq!(a.description(), "a chess board");
        assert_eq!(b.description(), "a weather dashboard");
    }

    #[test]
    fn removed_session_arc_stays_usable() {
        // An in-flight model call may still hold the Arc after teardown;
        // writes land in the detached session, never in the registry.
        let registry = SessionRegistry::new();
        let session = registry.create();
        registry.remove(session.id());
        session.push_user("late write");
        assert_eq!(session.transcript_len(), 1);
        assert!(registry.get(session.id()).is_none());
    }
}
