//! SSML helpers
//!
//! Responses are mostly short sentences coming back from the NLU agent, so
//! the only markup needed is escaping and the `<speak>` root element.

const SPEAK_OPEN: &str = "<speak>";
const SPEAK_CLOSE: &str = "</speak>";

/// Escape XML special characters
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap plain text in a `<speak>` document
#[must_use]
pub fn to_ssml(text: &str) -> String {
    format!("{SPEAK_OPEN}{}{SPEAK_CLOSE}", escape(text))
}

/// Whether an SSML document has no text between its root tags
#[must_use]
pub(crate) fn is_blank(document: &str) -> bool {
    document
        .trim()
        .strip_prefix(SPEAK_OPEN)
        .and_then(|rest| rest.strip_suffix(SPEAK_CLOSE))
        .map_or_else(|| document.trim().is_empty(), |inner| inner.trim().is_empty())
}
