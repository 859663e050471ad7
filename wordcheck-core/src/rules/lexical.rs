use super::matching::{forward_chars, Finding, TextMatch, SNIPPET_CONTEXT};
use crate::types::AlertKind;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Known misspellings flagged wherever they appear as whole words
pub const FORBIDDEN_WORDS_VI: &[&str] = &["qá", "cuyện", "táon"];

static FORBIDDEN_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FORBIDDEN_WORDS_VI
        .iter()
        .map(|word| {
            let re = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(word)))
                .case_insensitive(true)
                .build()
                .unwrap();
            (*word, re)
        })
        .collect()
});

/// A positional rule: wherever `base` matches, `expect_after` must match at
/// the start of the next `window` characters.
pub struct FormatRule {
    pub id: &'static str,
    pub message: &'static str,
    pub base: Regex,
    pub expect_after: Regex,
    pub window: usize,
    /// Characters of trailing context kept in violation snippets
    pub trailing_context: usize,
}

pub static DU_TOAN_MUA_SAM_RULE: LazyLock<FormatRule> = LazyLock::new(|| FormatRule {
    id: "dự toán mua sắm: mua sắm",
    message: "Sau 'dự toán mua sắm' phải có ': mua sắm'.",
    base: Regex::new(r"(?i)dự\s*toán\s*mua\s*sắm").unwrap(),
    expect_after: Regex::new(r"(?i)^\s*:\s*mua\s*sắm\b").unwrap(),
    window: 50,
    trailing_context: 60,
});

impl FormatRule {
    pub fn check(&self, text: &str) -> Vec<Finding> {
        self.base
            .find_iter(text)
            .filter(|m| {
                let window_end = forward_chars(text, m.end(), self.window);
                !self.expect_after.is_match(&text[m.end()..window_end])
            })
            .map(|m| Finding {
                kind: AlertKind::FormatRule {
                    rule: self.id.to_string(),
                    message: self.message.to_string(),
                },
                hit: TextMatch::locate_with_context(
                    text,
                    m.start(),
                    m.end(),
                    m.start(),
                    m.end(),
                    SNIPPET_CONTEXT,
                    self.trailing_context,
                ),
            })
            .collect()
    }
}

/// Every whole-word, case-insensitive occurrence of a forbidden word.
/// Results are grouped by list entry, then by position.
pub fn scan_forbidden_words(text: &str) -> Vec<Finding> {
    FORBIDDEN_PATTERNS
        .iter()
        .flat_map(|(canonical, re)| {
            re.find_iter(text).map(move |m| Finding {
                kind: AlertKind::ForbiddenWord {
                    wrong_word: m.as_str().to_string(),
                    canonical: canonical.to_string(),
                },
                hit: TextMatch::locate(text, m.start(), m.end()),
            })
        })
        .collect()
}

/// Violations of the "dự toán mua sắm: mua sắm" rule
pub fn check_format_rule(text: &str) -> Vec<Finding> {
    DU_TOAN_MUA_SAM_RULE.check(text)
}
