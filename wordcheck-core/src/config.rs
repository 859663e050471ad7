use crate::error::CheckError;
use crate::types::clean_text;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use tracing::{debug, warn};

/// Allowed range for the fuzzy spellcheck distance cap
pub const MIN_SPELL_DISTANCE: usize = 1;
pub const MAX_SPELL_DISTANCE: usize = 3;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_spell_max_distance() -> usize {
    2
}

/// Everything a check request can toggle. Loadable from YAML; every field has
/// a default so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Phrases that must appear in the document
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Match phrases with exact casing
    #[serde(default)]
    pub case_sensitive: bool,
    /// Only match phrases on word boundaries
    #[serde(default)]
    pub whole_word: bool,
    /// Include header and footer paragraphs of every section
    #[serde(default = "default_true")]
    pub scan_headers_footers: bool,
    /// Look for near-miss spellings of missing single-word phrases
    #[serde(default)]
    pub spellcheck_vi: bool,
    /// Edit distance cap for the fuzzy spellcheck (clamped to 1..=3)
    #[serde(default = "default_spell_max_distance")]
    pub spell_max_distance: usize,
    /// Enforce the "dự toán mua sắm: mua sắm" format rule
    #[serde(default)]
    pub check_format_rule: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            phrases: Vec::new(),
            case_sensitive: false,
            whole_word: false,
            scan_headers_footers: true,
            spellcheck_vi: false,
            spell_max_distance: default_spell_max_distance(),
            check_format_rule: false,
        }
    }
}

impl CheckConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: CheckConfig = serde_yaml::from_str(&content)?;
        debug!(path, phrases = config.phrases.len(), "loaded check config");
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!(path = p, error = %e, "failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Append phrases given one per line (blank lines ignored)
    pub fn with_phrase_lines(mut self, text: &str) -> Self {
        self.phrases.extend(phrases_from_lines(text));
        self
    }

    /// Copy with cleaned, deduplicated phrases and the distance cap clamped
    /// into range. The rule engine only ever sees normalized configs.
    pub fn normalized(&self) -> Self {
        Self {
            phrases: normalize_phrases(&self.phrases, self.case_sensitive),
            spell_max_distance: self
                .spell_max_distance
                .clamp(MIN_SPELL_DISTANCE, MAX_SPELL_DISTANCE),
            ..self.clone()
        }
    }

    /// Reject requests that cannot produce a meaningful report
    pub fn validate(&self) -> std::result::Result<(), CheckError> {
        if normalize_phrases(&self.phrases, self.case_sensitive).is_empty() {
            return Err(CheckError::EmptyPhraseList);
        }
        Ok(())
    }
}

/// Split caller input into phrases, one per non-blank line
pub fn phrases_from_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Clean, drop blanks and deduplicate keeping first-seen order and casing.
/// Without case sensitivity "Foo" and "foo" are the same phrase.
pub fn normalize_phrases(raw: &[String], case_sensitive: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|p| clean_text(p))
        .filter(|p| !p.is_empty())
        .filter(|p| {
            let key = if case_sensitive {
                p.clone()
            } else {
                p.to_lowercase()
            };
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedup_is_case_insensitive_by_default() {
        let phrases = normalize_phrases(&strings(&["Foo", "foo", "Foo"]), false);
        assert_eq!(phrases, strings(&["Foo"]));
    }

    #[test]
    fn dedup_keeps_case_variants_when_case_sensitive() {
        let phrases = normalize_phrases(&strings(&["Foo", "foo", "Foo"]), true);
        assert_eq!(phrases, strings(&["Foo", "foo"]));
    }

    #[test]
    fn phrases_are_trimmed_and_blanks_dropped() {
        let phrases = normalize_phrases(&strings(&["  dự toán ", "", "\u{a0}", "gói thầu"]), false);
        assert_eq!(phrases, strings(&["dự toán", "gói thầu"]));
    }

    #[test]
    fn phrase_lines_skip_blank_lines() {
        let phrases = phrases_from_lines("dự toán\n\n  gói thầu  \r\n");
        assert_eq!(phrases, strings(&["dự toán", "gói thầu"]));
    }

    #[test]
    fn normalized_clamps_spell_distance() {
        let mut config = CheckConfig::default();
        config.spell_max_distance = 0;
        assert_eq!(config.normalized().spell_max_distance, 1);
        config.spell_max_distance = 9;
        assert_eq!(config.normalized().spell_max_distance, 3);
        config.spell_max_distance = 2;
        assert_eq!(config.normalized().spell_max_distance, 2);
    }

    #[test]
    fn validate_rejects_blank_phrase_list() {
        let config = CheckConfig {
            phrases: strings(&["  ", ""]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CheckError::EmptyPhraseList)));
    }

    #[test]
    fn yaml_uses_serde_defaults() {
        let config: CheckConfig = serde_yaml::from_str("phrases:\n  - dự toán\nspellcheck_vi: true\n").unwrap();
        assert_eq!(config.phrases, strings(&["dự toán"]));
        assert!(config.spellcheck_vi);
        assert!(config.scan_headers_footers);
        assert!(!config.check_format_rule);
        assert_eq!(config.spell_max_distance, 2);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = CheckConfig::load_with_fallback(Some("/nonexistent/wordcheck.yaml"));
        assert_eq!(config, CheckConfig::default());
    }
}
