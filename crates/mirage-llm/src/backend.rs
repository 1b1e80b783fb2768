//! Model backend trait and error taxonomy.

use async_trait::async_trait;
use mirage_core::ChatMessage;

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors a model call can produce.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed (invalid or missing API key).
    #[error("auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Error description.
        message: String,
    },

    /// The API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Whether retrying could succeed.
        retryable: bool,
    },

    /// The API replied successfully but carried no usable text.
    #[error("empty reply from model")]
    EmptyReply,
}

impl BackendError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Mirage itself never retries (each interaction event maps to at most
    /// one model call); this classification is for operators reading logs.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s == reqwest::StatusCode::TOO_MANY_REQUESTS || s.is_server_error()
                    })
            }
            Self::RateLimited { .. } => true,
            Self::Api { retryable, .. } => *retryable,
            Self::Auth { .. } | Self::Json(_) | Self::EmptyReply => false,
        }
    }

    /// Error category string for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) => "parse",
            Self::Auth { .. } => "auth",
            Self::RateLimited { .. } => "rate_limit",
            Self::Api { .. } => "api",
            Self::EmptyReply => "empty",
        }
    }
}

/// A language model that completes a conversation.
///
/// The transcript is the entire context: implementations must send it
/// verbatim, in order, and return the reply text whole. Implementors must
/// be `Send + Sync` for use across connection tasks.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Model identifier, for logs and the health surface.
    fn model(&self) -> &str;

    /// Run one completion over the full transcript and return the raw
    /// reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> BackendResult<String>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_retryable() {
        let err = BackendError::RateLimited {
            message: "slow down".into(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.category(), "rate_limit");
    }

    #[test]
    fn api_error_honors_retryable_flag() {
        let err = BackendError::Api {
            status: 529,
            message: "overloaded".into(),
            retryable: true,
        };
        assert!(err.is_retryable());

        let err = BackendError::Api {
            status: 400,
            message: "bad request".into(),
            retryable: false,
        };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "API error (400): bad request");
    }

    #[test]
    fn auth_and_empty_not_retryable() {
        let auth = BackendError::Auth {
            message: "bad key".into(),
        };
        assert!(!auth.is_retryable());
        assert_eq!(auth.category(), "auth");

        let empty = BackendError::EmptyReply;
        assert!(!empty.is_retryable());
        assert_eq!(empty.category(), "empty");
    }

    #[test]
    fn backend_is_object_safe() {
        fn assert_object_safe(_: &dyn ModelBackend) {}
        let _ = assert_object_safe;
    }

    #[test]
    fn backend_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ModelBackend>();
    }
}
