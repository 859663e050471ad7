use thiserror::Error;

/// Failures raised around the scanning core: request validation, document
/// extraction and pattern compilation. Scanning itself never fails.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("phrase list is empty: provide at least one phrase to look for")]
    EmptyPhraseList,

    #[error("document is empty or unreadable")]
    EmptyDocument,

    #[error("unsupported file type '{0}' (supported: .docx, .json)")]
    UnsupportedFormat(String),

    #[error("legacy .doc input must be converted to .docx before checking: {0}")]
    LegacyFormat(String),

    #[error("document package is missing required part '{0}'")]
    MissingPart(String),

    #[error("malformed XML in '{part}': {message}")]
    Xml { part: String, message: String },

    #[error("invalid phrase pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl CheckError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        CheckError::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}
