//! # mirage-llm
//!
//! The model collaborator behind Mirage's view generation.
//!
//! [`ModelBackend`] is the whole contract: hand it an ordered, role-tagged
//! transcript, get one complete reply back (or an error). No streaming —
//! a view is rendered from a finished reply, never incrementally.
//!
//! [`AnthropicBackend`] is the production implementation, speaking the
//! Messages API over HTTPS.

#![deny(unsafe_code)]

pub mod anthropic;
pub mod backend;

pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use backend::{BackendError, BackendResult, ModelBackend};
