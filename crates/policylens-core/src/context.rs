//! Context extraction and relevance filtering.
//!
//! Windows are measured in characters, not bytes, and are clamped to the
//! text, so matches at either end of a document never panic.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use crate::catalog::vocabulary;
use crate::catalog::Relevance;

lazy_static! {
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// The window of up to `before` characters before `start` and `after`
/// characters after `end`, including the match itself.
///
/// Offsets are byte offsets as produced by `regex`; out-of-range or
/// mid-character offsets are clamped down to the nearest boundary.
pub fn extract_context(text: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    &text[context_bounds(text, start, end, before, after)]
}

/// Byte range of the window [`extract_context`] returns.
pub fn context_bounds(
    text: &str,
    start: usize,
    end: usize,
    before: usize,
    after: usize,
) -> Range<usize> {
    let start = floor_char_boundary(text, start);
    let end = floor_char_boundary(text, end).max(start);

    let lo = if before == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .take(before)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(start)
    };

    let hi = text[end..]
        .char_indices()
        .nth(after)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    lo..hi
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Whether a context is topically relevant enough for a match to count.
pub fn is_relevant(context: &str, requirement: Relevance) -> bool {
    match requirement {
        Relevance::None => true,
        Relevance::AiRelated => vocabulary::mentions_ai(context),
        Relevance::DataRelated => {
            vocabulary::mentions_ai(context) && vocabulary::mentions_data(context)
        }
        Relevance::ModelRelated => {
            vocabulary::mentions_ai(context) && vocabulary::mentions_model(context)
        }
        Relevance::AiOrData => {
            vocabulary::mentions_ai(context) || vocabulary::mentions_data(context)
        }
    }
}

/// Split text into trimmed sentences on `.`, `!` or `?` followed by whitespace.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // the terminator is ASCII, so start + 1 is a boundary
        let sentence = text[last..m.start() + 1].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        last = m.end();
    }
    let tail = text[last..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// The trimmed sentence of `text` containing byte `offset`.
pub fn sentence_at(text: &str, offset: usize) -> &str {
    let mut last = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        if offset < m.end() {
            return text[last..m.start() + 1].trim();
        }
        last = m.end();
    }
    text[last..].trim()
}

/// The first sentence of `text` that `pattern` matches.
pub fn first_sentence_matching<'a>(text: &'a str, pattern: &Regex) -> Option<&'a str> {
    sentences(text).into_iter().find(|s| pattern.is_match(s))
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_clamps_at_both_ends() {
        let text = "opt out now";
        assert_eq!(extract_context(text, 0, 7, 100, 100), "opt out now");
        assert_eq!(extract_context(text, 8, 11, 2, 100), "t now");
    }

    #[test]
    fn test_context_window_sizes() {
        let text = "0123456789abcdefghij";
        // match "ab" at 10..12
        assert_eq!(extract_context(text, 10, 12, 3, 2), "789abcd");
        assert_eq!(extract_context(text, 10, 12, 0, 0), "ab");
    }

    #[test]
    fn test_context_counts_characters_not_bytes() {
        let text = "ééé AI ééé";
        let start = text.find("AI").unwrap();
        assert_eq!(extract_context(text, start, start + 2, 2, 2), "é AI é");
    }

    #[test]
    fn test_context_never_panics_on_bad_offsets() {
        let text = "é";
        assert_eq!(extract_context(text, 1, 50, 10, 10), "é");
        assert_eq!(extract_context("", 0, 0, 100, 100), "");
    }

    #[test]
    fn test_relevance_requirements() {
        assert!(is_relevant("anything at all", Relevance::None));
        assert!(is_relevant("our AI features", Relevance::AiRelated));
        assert!(!is_relevant("opt out of marketing emails", Relevance::AiRelated));
        assert!(is_relevant("AI and customer data", Relevance::DataRelated));
        assert!(!is_relevant("AI features", Relevance::DataRelated));
        assert!(is_relevant("the AI model", Relevance::ModelRelated));
        assert!(!is_relevant("the AI chat", Relevance::ModelRelated));
        assert!(is_relevant("customer data", Relevance::AiOrData));
    }

    #[test]
    fn test_sentences_split_on_terminator_and_space() {
        let text = "First one. Second one! Third? v1.2 stays whole.";
        assert_eq!(
            sentences(text),
            vec!["First one.", "Second one!", "Third?", "v1.2 stays whole."]
        );
    }

    #[test]
    fn test_first_sentence_matching() {
        let pattern = Regex::new(r"(?i)contract").unwrap();
        let text = "We use partners. Partners are contractually bound. Done.";
        assert_eq!(
            first_sentence_matching(text, &pattern),
            Some("Partners are contractually bound.")
        );
    }

    #[test]
    fn test_sentence_at_offset() {
        let text = "Intro here. We avoid bias in models. Outro";
        let offset = text.find("bias").unwrap();
        assert_eq!(sentence_at(text, offset), "We avoid bias in models.");
        assert_eq!(sentence_at(text, 0), "Intro here.");
        assert_eq!(sentence_at(text, text.len() - 1), "Outro");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("SOC 2\n  Type II"), "SOC 2 Type II");
    }
}
