//! Check report: the output contract of a check request.
//!
//! Key names and nesting are consumed by existing clients and must not change.
//! Totals always describe the full result; the lists inside are capped.

pub mod aggregator;
pub mod serialization;

pub use aggregator::ReportAggregator;
pub use serialization::{ReportSummary, OUTPUT_FORMATS};

use crate::types::{Alert, Occurrence, TypoSuspect};
use serde::{Deserialize, Serialize};

/// Occurrences returned per phrase
pub const MAX_OCCURRENCES_PER_PHRASE: usize = 500;
/// Alerts returned per category
pub const MAX_ALERTS_PER_CATEGORY: usize = 500;
/// Typo suspects returned per phrase
pub const MAX_TYPO_SUSPECTS_PER_PHRASE: usize = crate::rules::spelling::MAX_TYPO_SUSPECTS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub stats: Stats,
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub hits: Vec<PhraseHits>,
    pub alerts: Alerts,
    pub notes: Notes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub phrases_total: usize,
    pub found: usize,
    pub missing: usize,
    /// Phrases with at least one typo suspect
    pub typo_suspects_phrases: usize,
    pub misspellings_total: usize,
    pub rule_violations_total: usize,
    pub capitalization_total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseHits {
    pub phrase: String,
    pub found: bool,
    /// Uncapped number of occurrences
    pub count: usize,
    pub occurrences: Vec<Occurrence>,
    pub typo_suspects: Vec<TypoSuspect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alerts {
    pub misspellings_total: usize,
    pub rule_violations_total: usize,
    pub capitalization_total: usize,
    pub misspellings: Vec<Alert>,
    pub rule_violations: Vec<Alert>,
    pub capitalization: Vec<Alert>,
}

/// Free-text explanations shipped with every report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    pub page_estimation: String,
    pub line_estimation: String,
    pub spellcheck_vi: String,
    pub capitalization: String,
}

impl Default for Notes {
    fn default() -> Self {
        Self {
            page_estimation: "page_est ước lượng theo Page Break trong DOCX (Insert → Page Break).".to_string(),
            line_estimation: "line_est ước lượng theo line break/ký tự xuống dòng có sẵn trong text.".to_string(),
            spellcheck_vi: "Spellcheck VI là fuzzy match (Damerau-Levenshtein) cho từ đơn; chỉ gợi ý 'nghi lỗi gõ sai'.".to_string(),
            capitalization: "Bỏ qua heading; cảnh báo mixed-case kiểu SƠn và chữ đầu câu sau dấu chấm không viết hoa.".to_string(),
        }
    }
}

impl Report {
    pub fn hits_for(&self, phrase: &str) -> Option<&PhraseHits> {
        self.hits.iter().find(|h| h.phrase == phrase)
    }

    /// Every phrase found and no alert of any kind
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.alerts.misspellings_total == 0
            && self.alerts.rule_violations_total == 0
            && self.alerts.capitalization_total == 0
    }
}
