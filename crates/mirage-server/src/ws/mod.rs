//! WebSocket layer: per-connection protocol loop and event dispatch.

pub mod handler;
pub mod session;

pub use session::run_ws_session;
