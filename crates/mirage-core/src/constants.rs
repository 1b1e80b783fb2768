//! Protocol constants.

/// Literal reply the model sends when an interaction warrants no visible
/// update. Compared after fence-stripping and whitespace trimming.
pub const NO_CHANGE: &str = "NO_CHANGE";

/// Marker attribute an element must carry (together with a unique `id`) for
/// the browser shell to raise interaction events for it. Elements without
/// the marker never raise events, even if they have an id.
pub const INTERACTIVE_ATTR: &str = "data-interactive";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_has_no_surrounding_whitespace() {
        assert_eq!(NO_CHANGE, NO_CHANGE.trim());
    }

    #[test]
    fn marker_is_a_data_attribute() {
        assert!(INTERACTIVE_ATTR.starts_with("data-"));
    }
}
