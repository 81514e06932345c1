//! Markup-to-text normalization.
//!
//! Every extractor yields a single line: whitespace runs collapse to one space
//! and the ends are trimmed. Malformed markup degrades the output but never fails.

use regex::Regex;
use std::sync::OnceLock;

/// Which backend turns raw markup into plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extractor {
    /// Regex stripping of script/style blocks and tags.
    #[default]
    Strip,
    /// html5ever parse, text nodes concatenated, entities decoded.
    Dom,
    /// Input is already text; only whitespace is normalized.
    Plain,
}

/// Convert raw input to normalized plain text with the chosen backend.
pub fn extract(raw: &str, extractor: Extractor) -> String {
    match extractor {
        Extractor::Strip => strip_markup(raw),
        Extractor::Dom => collapse_whitespace(&crate::dom::text_content(raw)),
        Extractor::Plain => collapse_whitespace(raw),
    }
}

/// Remove script/style blocks and all remaining tags, then collapse whitespace.
pub fn strip_markup(html: &str) -> String {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static STYLE: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();

    let script = SCRIPT.get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
    let style = STYLE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());

    let cleaned = script.replace_all(html, "");
    let cleaned = style.replace_all(&cleaned, "");
    let text = tag.replace_all(&cleaned, "");
    collapse_whitespace(&text)
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    let ws = WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    ws.replace_all(text, " ").trim().to_string()
}

/// First `max_chars` characters of `text`, for previews in progress output.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
