// Preprocessor abstraction for document intake
//
// This is the boundary between container formats (DOCX zip packages,
// pre-extracted JSON models) and the format-agnostic scanning pipeline.
// Everything after `extract` works on a SourceDocument.

use crate::types::SourceDocument;
use anyhow::Result;
use std::path::Path;

/// Preprocessor trait - converts raw document bytes into a SourceDocument
///
/// Implementations own the container parsing: package layout, markup
/// traversal, style lookup. They do not assign locations; that is the
/// LocationTagger's job.
pub trait Preprocessor: Send + Sync {
    /// Parse document bytes into body items and per-section headers/footers
    fn extract(&self, bytes: &[u8]) -> Result<SourceDocument>;

    /// Preprocessor name for logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}

/// Lowercased extension of `path`, if any
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
