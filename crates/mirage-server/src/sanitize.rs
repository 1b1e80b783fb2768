//! Markup sanitizer.
//!
//! Models routinely wrap replies in markdown code fences despite being told
//! not to. [`strip_fences`] removes one leading fence marker (with optional
//! language tag) and one trailing fence marker, trims surrounding
//! whitespace, and repeats until the text stops changing — so the function
//! is a fixpoint and applying it twice equals applying it once. Text with
//! no fence markers passes through untouched apart from the trim.

/// Remove markdown code-fence wrapping from a model reply.
#[must_use]
pub fn strip_fences(text: &str) -> String {
    let mut current = text.trim().to_owned();
    loop {
        let next = strip_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

/// One unwrap pass: leading marker, trailing marker, trim.
fn strip_once(text: &str) -> String {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        if let Some(newline) = s.find('\n') {
            // Marker (plus any language tag) occupies the first line.
            s = &s[newline + 1..];
        } else {
            // Single-line reply: excise exactly the marker token and its
            // language tag, never the content after it.
            s = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        }
    }

    if s.ends_with("```") {
        if let Some(pos) = s.rfind("\n```") {
            s = &s[..pos];
        } else {
            s = &s[..s.len() - 3];
        }
    }

    s.trim().to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
