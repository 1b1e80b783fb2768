//! Settings loading: compiled defaults, deep-merged user file, env overrides.
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)
//!
//! Environment overrides parse strictly: an out-of-range or malformed value
//! is ignored with a warning, falling back to the file/default value.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{LogLevel, MirageSettings};

/// Resolve the path to the settings file (`~/.mirage/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".mirage").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<MirageSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<MirageSettings> {
    let defaults = serde_json::to_value(MirageSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: MirageSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut MirageSettings) {
    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("MIRAGE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("MIRAGE_PORT", 1, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_usize("MIRAGE_MAX_CONNECTIONS", 1, 10_000) {
        settings.server.max_connections = v;
    }
    if let Some(v) = read_env_u64("MIRAGE_HEARTBEAT_INTERVAL", 1000, 600_000) {
        settings.server.heartbeat_interval_ms = v;
    }
    if let Some(v) = read_env_string("MIRAGE_INDEX") {
        settings.server.index_path = Some(v);
    }

    // ── Model ───────────────────────────────────────────────────────
    if let Some(v) = read_env_string("MIRAGE_MODEL") {
        settings.model.model = v;
    }
    if let Some(v) = read_env_u64("MIRAGE_MAX_TOKENS", 1, 128_000) {
        settings.model.max_tokens = u32::try_from(v).unwrap_or(u32::MAX);
    }
    if let Some(v) = read_env_string("MIRAGE_BASE_URL") {
        settings.model.base_url = Some(v);
    }

    // ── Gateway / logging ───────────────────────────────────────────
    if let Some(v) = read_env_usize("MIRAGE_GATEWAY_WORKERS", 1, 1000) {
        settings.gateway.max_concurrent_calls = v;
    }
    if let Some(v) = read_env_string("MIRAGE_LOG_LEVEL") {
        match serde_json::from_value::<LogLevel>(Value::String(v.to_lowercase())) {
            Ok(level) => settings.logging.level = level,
            Err(_) => warn!(value = %v, "invalid MIRAGE_LOG_LEVEL, ignoring"),
        }
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
