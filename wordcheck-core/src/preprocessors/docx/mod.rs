pub mod wordml;

use super::preprocessor::{file_extension, Preprocessor};
use crate::error::CheckError;
use crate::types::{SourceDocument, SourceParagraph, SourceSection};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use wordml::{parse_relationships, parse_story, parse_styles, StyleSheet};
use zip::result::ZipError;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

/// Reads DOCX packages directly: body, tables, and the default header and
/// footer of every section.
pub struct DocxPreprocessor;

impl DocxPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor for DocxPreprocessor {
    fn extract(&self, bytes: &[u8]) -> Result<SourceDocument> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).context("not a DOCX (zip) package")?;

        let document = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| CheckError::MissingPart(DOCUMENT_PART.to_string()))?;
        let styles = match read_part(&mut archive, STYLES_PART)? {
            Some(xml) => parse_styles(&xml)?,
            None => StyleSheet::default(),
        };
        let relationships = match read_part(&mut archive, RELATIONSHIPS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let story = parse_story(DOCUMENT_PART, &document, &styles)?;

        // Sections without their own reference reuse the previous section's.
        let mut stories: HashMap<String, Vec<SourceParagraph>> = HashMap::new();
        let mut header_id: Option<String> = None;
        let mut footer_id: Option<String> = None;
        let mut sections = Vec::with_capacity(story.sections.len());
        for refs in &story.sections {
            if refs.header.is_some() {
                header_id = refs.header.clone();
            }
            if refs.footer.is_some() {
                footer_id = refs.footer.clone();
            }
            sections.push(SourceSection {
                header: load_story(&mut archive, &relationships, &styles, &mut stories, header_id.as_deref())?,
                footer: load_story(&mut archive, &relationships, &styles, &mut stories, footer_id.as_deref())?,
            });
        }

        let document = SourceDocument {
            body: story.items,
            sections,
        };
        debug!(
            items = document.body.len(),
            sections = document.sections.len(),
            paragraphs = document.paragraph_count(),
            "extracted DOCX"
        );
        Ok(document)
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        file_extension(path).as_deref() == Some("docx")
    }
}

/// Paragraphs of the header/footer part a relationship id points at.
/// Dangling ids and missing parts give an empty story.
fn load_story<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
    styles: &StyleSheet,
    cache: &mut HashMap<String, Vec<SourceParagraph>>,
    id: Option<&str>,
) -> Result<Vec<SourceParagraph>> {
    let Some(path) = id.and_then(|id| relationships.get(id)) else {
        return Ok(Vec::new());
    };
    if let Some(paragraphs) = cache.get(path) {
        return Ok(paragraphs.clone());
    }
    let paragraphs = match read_part(archive, path)? {
        Some(xml) => parse_story(path, &xml, styles)?.paragraphs(),
        None => Vec::new(),
    };
    cache.insert(path.clone(), paragraphs.clone());
    Ok(paragraphs)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = String::new();
            file.read_to_string(&mut content)
                .with_context(|| format!("failed to read '{name}'"))?;
            Ok(Some(content))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to open '{name}'")),
    }
}
