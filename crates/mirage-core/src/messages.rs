//! Conversation transcript types.
//!
//! A [`Transcript`] is the ordered list of role-tagged messages that forms
//! the model's context. It is passed to the backend verbatim: nothing here
//! summarizes, truncates, or reorders it. A transcript grows without bound
//! for the life of its session — a known scalability limit that callers
//! accept rather than paper over.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The client side of the conversation (prompts built by the server).
    User,
    /// The model's reply.
    Assistant,
}

/// One message in a transcript.
///
/// Serializes to the `{"role": ..., "content": ...}` shape the Messages API
/// consumes, so a transcript can be embedded in a request body as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a `user` message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an `assistant` message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation history for one session.
///
/// Requests to the model always end on a `user` message: the caller appends
/// the prompt before invoking the backend and appends the reply after, so a
/// healthy transcript strictly alternates `user, assistant, user, ...`.
/// A failed model call leaves a trailing unanswered `user` entry; that
/// asymmetry is deliberate and is not repaired here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `user` message.
    pub fn append_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// Append an `assistant` message.
    pub fn append_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Clear all messages. Used when a session is (re)initialized.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    /// The messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Role of the most recent message, if any.
    #[must_use]
    pub fn last_role(&self) -> Option<Role> {
        self.messages.last().map(|m| m.role)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
