use super::matching::TextMatch;
use crate::error::CheckError;
use regex::{Regex, RegexBuilder};

/// Compiled literal matchers for the request's phrase list.
///
/// Phrases are escaped, never interpreted as patterns. Results are indexed by
/// phrase position so the aggregator can fill a pre-sized table.
pub struct PhraseScanner {
    patterns: Vec<Option<Regex>>,
}

impl PhraseScanner {
    pub fn new(phrases: &[String], case_sensitive: bool, whole_word: bool) -> Result<Self, CheckError> {
        let patterns = phrases
            .iter()
            .map(|phrase| build_phrase_pattern(phrase, case_sensitive, whole_word))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Non-overlapping matches of every phrase in `text`, left to right
    pub fn scan(&self, text: &str) -> Vec<Vec<TextMatch>> {
        self.patterns
            .iter()
            .map(|pattern| match pattern {
                Some(re) if !text.is_empty() => re
                    .find_iter(text)
                    .map(|m| TextMatch::locate(text, m.start(), m.end()))
                    .collect(),
                _ => Vec::new(),
            })
            .collect()
    }
}

/// Literal pattern for one phrase; blank phrases get no pattern
pub fn build_phrase_pattern(
    phrase: &str,
    case_sensitive: bool,
    whole_word: bool,
) -> Result<Option<Regex>, CheckError> {
    if phrase.trim().is_empty() {
        return Ok(None);
    }
    let escaped = regex::escape(phrase);
    let pattern = if whole_word {
        format!(r"\b{escaped}\b")
    } else {
        escaped
    };
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()?;
    Ok(Some(re))
}

/// One-shot scan: phrase → matches, in phrase order
pub fn scan_phrases<'p>(
    text: &str,
    phrases: &'p [String],
    case_sensitive: bool,
    whole_word: bool,
) -> Result<Vec<(&'p str, Vec<TextMatch>)>, CheckError> {
    let scanner = PhraseScanner::new(phrases, case_sensitive, whole_word)?;
    Ok(phrases
        .iter()
        .map(String::as_str)
        .zip(scanner.scan(text))
        .collect())
}
