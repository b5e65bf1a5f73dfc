use std::sync::LazyLock;

use regex::Regex;

use super::normalize::collapse_whitespace;

/// Anything that is not a word character, whitespace, or the punctuation
/// clinical notes rely on (`. , ; : - ( )`).
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,;:\-()]+").unwrap());

/// Strip decorative characters from report text while keeping medical
/// abbreviations, dosages and vitals readable.
///
/// Whitespace is collapsed to single spaces and casing is kept, so the
/// result still segments cleanly into sentences.
pub fn clean_report_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let replaced = DISALLOWED_CHARS.replace_all(&collapsed, " ");
    collapse_whitespace(&replaced)
}
