//! Branded ID newtypes.
//!
//! Session and connection tokens are opaque strings generated server-side
//! (UUID v7, time-ordered). Wrapping them in distinct newtypes keeps a
//! connection token from ever being passed where a session token belongs.
//! The token is deliberately independent of any transport-level identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! opaque_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh token (UUID v7, time-ordered).
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// View the token as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

opaque_token! {
    /// Identifies one session: the conversation state owned by a single
    /// client connection for its lifetime.
    SessionId
}

opaque_token! {
    /// Identifies one WebSocket connection, for log correlation.
    ConnectionId
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_is_uuid_v7() {
        let id = SessionId::generate();
        let parsed = Uuid::parse_str(id.as_str()).expect("valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn tokens_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn display_matches_inner() {
        let id = SessionId::from("sess-1");
        assert_eq!(format!("{id}"), "sess-1");
    }

    #[test]
    fn serde_is_transparent() {
        let id = ConnectionId::from("conn-9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"conn-9\"");
        let back: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn usable_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        let id = SessionId::generate();
        let _ = map.insert(id.clone(), 1u32);
        assert_eq!(map.get(&id), Some(&1));
    }
}
