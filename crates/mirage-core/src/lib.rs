//! # mirage-core
//!
//! Foundation types shared by every Mirage crate.
//!
//! - **Branded IDs**: [`SessionId`] and [`ConnectionId`] newtypes so a
//!   session token can never be confused with a connection token
//! - **Transcript**: [`ChatMessage`] / [`Transcript`] — the ordered,
//!   role-tagged conversation passed verbatim to the model backend
//! - **Wire events**: [`ClientEvent`] / [`ServerEvent`] — the JSON payloads
//!   exchanged with a connected browser
//! - **Constants**: the [`NO_CHANGE`](constants::NO_CHANGE) sentinel

#![deny(unsafe_code)]

pub mod constants;
pub mod events;
pub mod ids;
pub mod messages;

pub use events::{ClientEvent, ServerEvent};
pub use ids::{ConnectionId, SessionId};
pub use messages::{ChatMessage, Role, Transcript};
