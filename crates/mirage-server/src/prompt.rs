//! Prompt builder.
//!
//! Two pure functions of session state and event data. Neither touches the
//! transcript — the gateway appends the returned text as a `user` message
//! when it invokes the model. Both are deterministic given their inputs, so
//! identical interactions produce identical prompts.

use std::collections::BTreeMap;

use mirage_core::constants::{INTERACTIVE_ATTR, NO_CHANGE};

/// Build the prompt that renders the initial screen for a freshly
/// described application.
#[must_use]
pub fn build_init_prompt(description: &str) -> String {
    format!(
        r#"You are an application with the following purpose: {description}

The application is rendered to a user in their browser. Your job is to generate HTML representing the current view of the application.

Generate standard HTML (no external dependencies; inline CSS is fine) for the home screen of this application.

Interactivity rules:
1. Every element the user should be able to interact with (buttons, links, submittable rows, etc.) must carry a unique "id" attribute AND {INTERACTIVE_ATTR}="true". When the user activates such an element, the interaction is sent back to you so you can update the application state and generate a new view.
2. Input and text-entry elements marked with {INTERACTIVE_ATTR} additionally raise their event when the user presses Enter in them.
3. Elements WITHOUT {INTERACTIVE_ATTR} never raise events, even if they have an id. Leave the marker off free-text fields that should not trigger an update on their own.

Output ONLY the HTML, with no markdown formatting and no explanation."#
    )
}

/// Build the prompt that processes one interaction event.
#[must_use]
pub fn build_interaction_prompt(element_id: &str, form_data: &BTreeMap<String, String>) -> String {
    let form_section = if form_data.is_empty() {
        String::new()
    } else {
        let listing = serde_json::to_string_pretty(form_data).unwrap_or_default();
        format!("\n\nCurrent form field values:\n{listing}")
    };

    format!(
        r#"The user has just activated the element with id "{element_id}".{form_section}

Process this interaction and decide whether the view needs to be updated.

If the view does NOT need to change (for example an invalid action, or processing with no visible effect), respond with exactly:
{NO_CHANGE}

If the view DOES need to change, generate the complete replacement HTML for the new state of the application.

Remember to:
1. Give every interactive element a unique "id" and {INTERACTIVE_ATTR}="true" (marked inputs also fire on Enter)
2. Output ONLY the HTML (or {NO_CHANGE}), with no markdown formatting and no explanation
3. Use standard HTML with inline CSS if needed"#
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    // -- init prompt --

    #[test]
    fn init_prompt_states_purpose() {
        let prompt = build_init_prompt("a counter app");
        assert!(prompt.contains("purpose: a counter app"));
    }

    #[test]
    fn init_prompt_demands_marker_and_id() {
        let prompt = build_init_prompt("x");
        assert!(prompt.contains("unique \"id\""));
        assert!(prompt.contains("data-interactive=\"true\""));
    }

    #[test]
    fn init_prompt_covers_enter_key_and_exemption() {
        let prompt = build_init_prompt("x");
        assert!(prompt.contains("presses Enter"));
        assert!(prompt.contains("never raise events"));
    }

    #[test]
    fn init_prompt_forbids_fences_and_prose() {
        let prompt = build_init_prompt("x");
        assert!(prompt.contains("ONLY the HTML"));
        assert!(prompt.contains("no markdown formatting"));
    }

    #[test]
    fn init_prompt_is_deterministic() {
        assert_eq!(build_init_prompt("todo list"), build_init_prompt("todo list"));
    }

    #[test]
    fn init_prompt_accepts_empty_description() {
        // Permissive handling of a missing description upstream.
        let prompt = build_init_prompt("");
        assert!(prompt.contains("purpose: \n"));
    }

    // -- interaction prompt --

    #[test]
    fn interaction_prompt_names_element() {
        let prompt = build_interaction_prompt("increment-button", &BTreeMap::new());
        assert!(prompt.contains("element with id \"increment-button\""));
    }

    #[test]
    fn interaction_prompt_mentions_sentinel() {
        let prompt = build_interaction_prompt("x", &BTreeMap::new());
        assert!(prompt.contains("\nNO_CHANGE\n"));
    }

    #[test]
    fn interaction_prompt_omits_form_section_when_empty() {
        let prompt = build_interaction_prompt("x", &BTreeMap::new());
        assert!(!prompt.contains("Current form field values"));
    }

    #[test]
    fn interaction_prompt_lists_form_fields() {
        let prompt =
            build_interaction_prompt("submit", &form(&[("name", "Ada"), ("city", "London")]));
        assert!(prompt.contains("Current form field values"));
        assert!(prompt.contains("\"name\": \"Ada\""));
        assert!(prompt.contains("\"city\": \"London\""));
    }

    #[test]
    fn interaction_prompt_field_order_is_stable() {
        let a = build_interaction_prompt("s", &form(&[("b", "2"), ("a", "1")]));
        let b = build_interaction_prompt("s", &form(&[("a", "1"), ("b", "2")]));
        assert_eq!(a, b);
    }

    #[test]
    fn interaction_prompt_repeats_interactivity_rules() {
        let prompt = build_interaction_prompt("x", &BTreeMap::new());
        assert!(prompt.contains("data-interactive=\"true\""));
        assert!(prompt.contains("fire on Enter"));
    }
}
