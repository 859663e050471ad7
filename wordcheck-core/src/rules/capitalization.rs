use super::matching::{Finding, TextMatch, SNIPPET_CONTEXT, WORD_TOKEN};
use crate::types::AlertKind;
use regex::Regex;
use std::sync::LazyLock;

const MIXED_CASE_MESSAGE: &str = "Từ có kiểu HOA/thường bất thường (ví dụ SƠn).";
const SENTENCE_START_MESSAGE: &str = "Sau dấu chấm/câu hỏi/cảm thán nên viết HOA chữ cái đầu câu.";

// Sentence end, whitespace, then a lowercase letter (captured).
static SENTENCE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?…]\s+(\p{Ll})").unwrap());

/// First letter uppercase, every other letter lowercase
pub fn is_title_case_word(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic());
    match letters.next() {
        Some(first) if first.is_uppercase() => letters.all(|c| c.is_lowercase()),
        _ => false,
    }
}

/// Words mixing upper and lower case outside of title case ("SƠn", "sƠn", "SoN")
pub fn find_mixed_case_words(text: &str) -> Vec<Finding> {
    WORD_TOKEN
        .find_iter(text)
        .filter(|m| {
            let token = m.as_str();
            let letters = token.chars().filter(|c| c.is_alphabetic()).count();
            if letters < 2 {
                return false;
            }
            let has_upper = token.chars().any(char::is_uppercase);
            let has_lower = token.chars().any(char::is_lowercase);
            has_upper && has_lower && !is_title_case_word(token)
        })
        .map(|m| Finding {
            kind: AlertKind::MixedCase {
                word: m.as_str().to_string(),
                message: MIXED_CASE_MESSAGE.to_string(),
            },
            hit: TextMatch::locate(text, m.start(), m.end()),
        })
        .collect()
}

/// Lowercase letters opening a sentence inside the block. The first sentence
/// of a block is not checked.
pub fn find_sentence_start_not_capitalized(text: &str) -> Vec<Finding> {
    SENTENCE_START
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps.get(1)?;
            Some(Finding {
                kind: AlertKind::SentenceCapitalization {
                    character: letter.as_str().to_string(),
                    message: SENTENCE_START_MESSAGE.to_string(),
                },
                hit: TextMatch::locate_with_context(
                    text,
                    letter.start(),
                    letter.end(),
                    whole.start(),
                    whole.end(),
                    SNIPPET_CONTEXT,
                    SNIPPET_CONTEXT,
                ),
            })
        })
        .collect()
}
