//! Translation key suggestions.
//!
//! A layer name that already looks like an identifier (`home.title`,
//! `cta_label`) is taken as the designer's intended key. Anything else falls
//! back to a slug of the text content.

use std::sync::LazyLock;

use regex::Regex;

/// Key returned when neither the label nor the text yields anything usable.
pub const FALLBACK_KEY: &str = "text";

/// Maximum length of a key derived from text content.
pub const MAX_DERIVED_KEY_LEN: usize = 30;

/// Labels at or above this length are never treated as keys.
const MAX_LABEL_KEY_LEN: usize = 50;

static KEY_LIKE_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._]+$").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Suggest a translation key for a text node.
///
/// # Examples
///
/// ```
/// use glot_sync::core::suggest_key;
///
/// assert_eq!(suggest_key("Home.Title", "Welcome back"), "home.title");
/// assert_eq!(suggest_key("Text 12", "Welcome back!"), "welcome_back");
/// assert_eq!(suggest_key("Frame 3", "!!!"), "text");
/// ```
pub fn suggest_key(label: &str, text: &str) -> String {
    if is_key_like_label(label) {
        return WHITESPACE_REGEX
            .replace_all(&label.to_lowercase(), "_")
            .into_owned();
    }

    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let key: String = WHITESPACE_REGEX
        .replace_all(stripped.trim(), "_")
        .chars()
        .take(MAX_DERIVED_KEY_LEN)
        .collect();

    if key.is_empty() {
        FALLBACK_KEY.to_string()
    } else {
        key
    }
}

fn is_key_like_label(label: &str) -> bool {
    label.chars().count() < MAX_LABEL_KEY_LEN && KEY_LIKE_LABEL_REGEX.is_match(label)
}
