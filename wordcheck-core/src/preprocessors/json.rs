use super::preprocessor::{file_extension, Preprocessor};
use crate::types::SourceDocument;
use anyhow::{Context, Result};
use std::path::Path;

/// Reads a document model that was already extracted elsewhere and
/// serialized as JSON.
pub struct JsonPreprocessor;

impl JsonPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for JsonPreprocessor {
    fn extract(&self, bytes: &[u8]) -> Result<SourceDocument> {
        let document: SourceDocument =
            serde_json::from_slice(bytes).context("failed to parse document model JSON")?;
        Ok(document)
    }

    fn name(&self) -> &str {
        "json"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        file_extension(path).as_deref() == Some("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceItem, SourceParagraph};

    #[test]
    fn parses_tagged_items() {
        let json = r#"{
            "body": [
                {"type": "paragraph", "text": "Điều 1", "style_name": "Heading 1"},
                {"type": "table", "rows": [{"cells": [{"paragraphs": [{"text": "ô"}]}]}]}
            ],
            "sections": [{"header": [{"text": "Đầu trang"}]}]
        }"#;
        let doc = JsonPreprocessor::new().extract(json.as_bytes()).unwrap();
        assert_eq!(
            doc.body[0],
            SourceItem::Paragraph(SourceParagraph::new("Điều 1").with_style("Heading 1"))
        );
        assert!(matches!(&doc.body[1], SourceItem::Table(t) if t.rows[0].cells[0].paragraphs[0].text == "ô"));
        assert_eq!(doc.sections[0].header[0].text, "Đầu trang");
        assert!(doc.sections[0].footer.is_empty());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(JsonPreprocessor::new().extract(b"not json").is_err());
    }

    #[test]
    fn supports_json_extension_only() {
        let pre = JsonPreprocessor::new();
        assert!(pre.supports_file_type(Path::new("model.JSON")));
        assert!(!pre.supports_file_type(Path::new("doc.docx")));
    }
}
