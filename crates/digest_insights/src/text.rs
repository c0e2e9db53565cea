use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|`").expect("emphasis regex is valid"));

/// Truncates `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts chars rather than bytes so multi-byte labels never split mid-codepoint.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str("...");
    out
}

/// Removes markdown emphasis markers and collapses inner whitespace.
pub(crate) fn strip_markdown(text: &str) -> String {
    EMPHASIS_RE
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased word tokens; apostrophes inside words are kept ("don't").
pub(crate) fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
