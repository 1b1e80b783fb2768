//! Wire events exchanged with a connected browser.
//!
//! Inbound and outbound payloads are JSON objects discriminated by a
//! `"type"` field. Decoding of inbound events is permissive: a missing
//! `description`, `elementId`, or `formData` defaults to an empty value
//! rather than failing the connection. An unrecognized `"type"` is a
//! decode error — callers log and skip it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A client-originated event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Start (or restart) the session with a new application description.
    Init {
        /// Free-text description of the application to imagine.
        #[serde(default)]
        description: String,
    },
    /// A marked element was activated in the current view.
    Interaction {
        /// The `id` attribute of the activated element.
        #[serde(default, rename = "elementId")]
        element_id: String,
        /// Current form field values, keyed by field name. Keys are unique;
        /// ordering carries no meaning (kept sorted for stable prompts).
        #[serde(default, rename = "formData")]
        form_data: BTreeMap<String, String>,
    },
}

/// A server-originated view instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Replace the displayed view with this markup.
    Html {
        /// Sanitized markup for the full view.
        content: String,
    },
    /// The view is unchanged; nothing to redraw.
    NoChange,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
