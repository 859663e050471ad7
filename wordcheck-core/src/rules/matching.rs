// Shared match bookkeeping for all scanners: character spans, line
// estimates and context snippets, all relative to a single block's text.

use crate::types::{AlertKind, MatchSpan};
use regex::Regex;
use std::sync::LazyLock;

/// Replaces embedded newlines inside snippets so they stay single-line
pub const NEWLINE_MARKER: &str = " ↵ ";

/// Context characters kept on each side of a match
pub const SNIPPET_CONTEXT: usize = 40;

/// Word tokens: ASCII letters plus the Latin-1/Latin Extended range used by
/// Vietnamese, and Đ/đ
pub static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zÀ-ỹĐđ]+").unwrap());

/// One match inside a block, positions already converted for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub span: MatchSpan,
    pub line: usize,
    pub snippet: String,
}

impl TextMatch {
    /// Build from a byte range with symmetric snippet context
    pub fn locate(text: &str, start: usize, end: usize) -> Self {
        Self::locate_with_context(text, start, end, start, end, SNIPPET_CONTEXT, SNIPPET_CONTEXT)
    }

    /// Build from a byte range; the snippet window is anchored on
    /// `[context_start, context_end)` and widened by the given char counts.
    pub fn locate_with_context(
        text: &str,
        start: usize,
        end: usize,
        context_start: usize,
        context_end: usize,
        before: usize,
        after: usize,
    ) -> Self {
        Self {
            span: MatchSpan {
                start: char_offset(text, start),
                end: char_offset(text, end),
            },
            line: line_estimate(text, start),
            snippet: snippet(text, context_start, context_end, before, after),
        }
    }
}

/// A non-phrase scanner result waiting for its block location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: AlertKind,
    pub hit: TextMatch,
}

/// Character offset of a byte index
pub fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// 1-based line number: newlines before `byte` within the block, plus one
pub fn line_estimate(text: &str, byte: usize) -> usize {
    text[..byte].matches('\n').count() + 1
}

/// Byte index `n` characters before `byte`, clamped to the start of text
pub fn back_chars(text: &str, byte: usize, n: usize) -> usize {
    text[..byte]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(byte)
}

/// Byte index `n` characters after `byte`, clamped to the end of text
pub fn forward_chars(text: &str, byte: usize, n: usize) -> usize {
    text[byte..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| byte + i)
        .unwrap_or(text.len())
}

/// Context window around `[start, end)` with newlines made visible
pub fn snippet(text: &str, start: usize, end: usize, before: usize, after: usize) -> String {
    let left = back_chars(text, start, before);
    let right = forward_chars(text, end, after);
    text[left..right].replace('\n', NEWLINE_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_count_characters_not_bytes() {
        let text = "dự toán";
        let start = text.find("toán").unwrap();
        assert_eq!(start, 5);
        assert_eq!(char_offset(text, start), 3);
    }

    #[test]
    fn line_estimate_counts_newlines_before_match() {
        let text = "một\nhai\nba";
        assert_eq!(line_estimate(text, 0), 1);
        assert_eq!(line_estimate(text, text.find("ba").unwrap()), 3);
    }

    #[test]
    fn snippet_is_clamped_to_block() {
        let text = "ngắn";
        assert_eq!(snippet(text, 0, text.len(), 40, 40), "ngắn");
    }

    #[test]
    fn snippet_takes_context_in_characters() {
        let text = "ắắắắX ắắ";
        let start = text.find('X').unwrap();
        assert_eq!(snippet(text, start, start + 1, 2, 2), "ắắX ắ");
    }

    #[test]
    fn snippet_marks_newlines() {
        let text = "dòng một\ndòng hai";
        assert_eq!(snippet(text, 0, text.len(), 0, 0), "dòng một ↵ dòng hai");
    }

    #[test]
    fn word_tokens_include_vietnamese_letters() {
        let words: Vec<&str> = WORD_TOKEN
            .find_iter("Đơn giá: 1.000đ, SƠn!")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(words, vec!["Đơn", "giá", "đ", "SƠn"]);
    }
}
