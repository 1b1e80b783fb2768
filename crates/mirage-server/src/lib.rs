//! # mirage-server
//!
//! The interaction protocol core behind Mirage's on-demand views.
//!
//! - **Session registry**: one [`session::Session`] per connection, created
//!   at accept and removed at close
//! - **Prompt builder**: deterministic init/interaction prompts
//! - **Markup sanitizer**: code-fence stripping for model replies
//! - **Model gateway**: semaphore-bounded bridge to the backend — one slow
//!   session never stalls the others' control plane
//! - **WebSocket loop**: per-connection state machine with strict in-session
//!   event ordering
//! - **HTTP surface**: static shell, `/health`, `/metrics`, graceful shutdown

#![deny(unsafe_code)]

pub mod assets;
pub mod config;
pub mod gateway;
pub mod health;
pub mod metrics;
pub mod prompt;
pub mod sanitize;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod ws;

pub use config::ServerConfig;
pub use gateway::ModelGateway;
pub use sanitize::strip_fences;
pub use server::{AppState, MirageServer};
pub use session::{Session, SessionRegistry};
pub use shutdown::ShutdownCoordinator;
