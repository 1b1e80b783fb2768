//! # mirage-settings
//!
//! Configuration for the Mirage server, loaded from three layers in
//! priority order:
//!
//! 1. **Compiled defaults** — [`MirageSettings::default()`]
//! 2. **User file** — `~/.mirage/settings.json`, deep-merged over defaults
//! 3. **Environment variables** — `MIRAGE_*` overrides (highest priority)
//!
//! API credentials are not settings: the server reads `ANTHROPIC_API_KEY`
//! from the environment at startup and never writes it to disk.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
