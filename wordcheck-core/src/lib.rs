// Wordcheck Core Library
//
// Checks the text of Word documents against a phrase list and a set of
// Vietnamese typing rules. Main interface: DocumentChecker for files,
// RuleEngine for already-tagged blocks.

pub mod classifier;
pub mod config;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod report;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use config::CheckConfig;
pub use error::CheckError;
pub use preprocessors::{DocxPreprocessor, JsonPreprocessor, LocationTagger, Preprocessor};
pub use processor::{CheckStages, DocumentChecker, StepProfiler};
pub use report::{Report, ReportSummary, OUTPUT_FORMATS};
pub use rules::RuleEngine;
pub use types::*;
