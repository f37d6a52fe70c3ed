/*!
 * Text normalization shared by the aligner and the hallucination filter.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Anything that is not a lowercase letter (Ll), an ASCII digit or whitespace
static STRIPPED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{Ll}0-9\s]").unwrap());

/// Normalize cue text for comparison
///
/// Lowercases, turns line breaks into spaces, drops every character that is not
/// a lowercase letter, an ASCII digit or whitespace, then collapses whitespace
/// runs. Uncased scripts, numeral symbols and fractions are dropped.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase().replace(['\r', '\n'], " ");

    let stripped = STRIPPED_CHARS.replace_all(&lowered, "");

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into words
pub fn words(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}
