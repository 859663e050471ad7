use super::distance::distance_chars;
use super::matching::{TextMatch, WORD_TOKEN};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Per-phrase cap on returned typo suspects
pub const MAX_TYPO_SUSPECTS: usize = 50;

/// Remove Vietnamese tone and vowel marks: đ/Đ become d/D, everything else is
/// decomposed and stripped of combining marks.
pub fn strip_tones(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'đ' => 'd',
            'Đ' => 'D',
            other => other,
        })
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// A near-miss spelling of an expected word, before location is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypoMatch {
    pub typed_in_doc: String,
    pub distance: usize,
    pub hit: TextMatch,
}

/// An expected single word prepared for repeated fuzzy scans
#[derive(Debug, Clone)]
pub struct TypoTarget {
    lowered: String,
    lowered_chars: Vec<char>,
    base_chars: Vec<char>,
}

impl TypoTarget {
    /// `None` for blank phrases and phrases with internal whitespace
    pub fn new(expected: &str) -> Option<Self> {
        let expected = expected.trim();
        if expected.is_empty() || expected.chars().any(char::is_whitespace) {
            return None;
        }
        let lowered = expected.to_lowercase();
        Some(Self {
            lowered_chars: lowered.chars().collect(),
            base_chars: strip_tones(&lowered).chars().collect(),
            lowered,
        })
    }

    /// Word tokens of `text` within `max_dist` of the target, nearest first
    pub fn find_in(&self, text: &str, max_dist: usize) -> Vec<TypoMatch> {
        let mut hits: Vec<(String, TypoMatch)> = WORD_TOKEN
            .find_iter(text)
            .filter_map(|m| {
                let token = m.as_str();
                let token_lower = token.to_lowercase();
                if token_lower == self.lowered {
                    return None;
                }

                // Cheap rejection on toneless forms first.
                let token_base: Vec<char> = strip_tones(&token_lower).chars().collect();
                if distance_chars(&self.base_chars, &token_base, max_dist) > max_dist {
                    return None;
                }

                let token_chars: Vec<char> = token_lower.chars().collect();
                let dist = distance_chars(&self.lowered_chars, &token_chars, max_dist);
                if dist > max_dist {
                    return None;
                }

                Some((
                    token_lower,
                    TypoMatch {
                        typed_in_doc: token.to_string(),
                        distance: dist,
                        hit: TextMatch::locate(text, m.start(), m.end()),
                    },
                ))
            })
            .collect();

        hits.sort_by(|(a_key, a), (b_key, b)| a.distance.cmp(&b.distance).then_with(|| a_key.cmp(b_key)));
        hits.truncate(MAX_TYPO_SUSPECTS);
        hits.into_iter().map(|(_, hit)| hit).collect()
    }
}

/// Fuzzy suspects for one expected word in one block of text
pub fn find_typos(expected: &str, text: &str, max_dist: usize) -> Vec<TypoMatch> {
    match TypoTarget::new(expected) {
        Some(target) => target.find_in(text, max_dist),
        None => Vec::new(),
    }
}
