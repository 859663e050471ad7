use serde::{Deserialize, Serialize};

// ===== SOURCE DOCUMENT MODEL =====
// What a preprocessor hands over: the document's structure in traversal
// order, before any location bookkeeping. The LocationTagger turns this into
// Blocks.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceParagraph {
    pub text: String,
    /// Display name of the paragraph style (e.g. "Heading 1", "Normal")
    #[serde(default)]
    pub style_name: Option<String>,
    /// Paragraph contains an explicit page break (`<w:br w:type="page"/>`)
    #[serde(default)]
    pub has_page_break: bool,
}

impl SourceParagraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style_name: None,
            has_page_break: false,
        }
    }

    pub fn with_style(mut self, style_name: impl Into<String>) -> Self {
        self.style_name = Some(style_name.into());
        self
    }

    pub fn with_page_break(mut self) -> Self {
        self.has_page_break = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCell {
    pub paragraphs: Vec<SourceParagraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub cells: Vec<SourceCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTable {
    pub rows: Vec<SourceRow>,
}

/// Top-level body content, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceItem {
    Paragraph(SourceParagraph),
    Table(SourceTable),
}

/// Header/footer content of one document section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default)]
    pub header: Vec<SourceParagraph>,
    #[serde(default)]
    pub footer: Vec<SourceParagraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub body: Vec<SourceItem>,
    #[serde(default)]
    pub sections: Vec<SourceSection>,
}

impl SourceDocument {
    /// Number of paragraphs across body, table cells, headers and footers
    pub fn paragraph_count(&self) -> usize {
        let body: usize = self
            .body
            .iter()
            .map(|item| match item {
                SourceItem::Paragraph(_) => 1,
                SourceItem::Table(table) => table
                    .rows
                    .iter()
                    .flat_map(|row| row.cells.iter())
                    .map(|cell| cell.paragraphs.len())
                    .sum(),
            })
            .sum();
        let stories: usize = self
            .sections
            .iter()
            .map(|s| s.header.len() + s.footer.len())
            .sum();
        body + stories
    }
}

// ===== BLOCK + LOCATION =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Body,
    Header,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    TableCell,
}

/// Structural counters, all 1-based. Which ones are set depends on where the
/// block lives: body paragraphs carry `paragraph_index`; table cells carry the
/// table/row/col/cell counters plus `global_paragraph_index`; header and
/// footer paragraphs carry `section` and `paragraph_index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralIndices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_paragraph_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_paragraph_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub area: Area,
    pub kind: BlockKind,
    /// Page estimate from explicit page breaks; `None` for headers/footers
    pub page_est: Option<u32>,
    #[serde(flatten)]
    pub indices: StructuralIndices,
    pub style_name: Option<String>,
}

/// One structural text unit, immutable once produced by the tagger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
    pub location: Location,
}

// ===== FINDINGS =====

/// Location of a single match: the block's location plus the line within it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLocation {
    #[serde(flatten)]
    pub location: Location,
    pub line_est: usize,
}

impl MatchLocation {
    pub fn new(location: &Location, line_est: usize) -> Self {
        Self {
            location: location.clone(),
            line_est,
        }
    }
}

/// Half-open `[start, end)` span in characters of the block text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub phrase: String,
    #[serde(rename = "where")]
    pub location: MatchLocation,
    #[serde(rename = "match")]
    pub span: MatchSpan,
    pub snippet: String,
    /// Full text of the block the match was found in
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    ForbiddenWord {
        wrong_word: String,
        canonical: String,
    },
    FormatRule {
        rule: String,
        message: String,
    },
    MixedCase {
        word: String,
        message: String,
    },
    SentenceCapitalization {
        #[serde(rename = "char")]
        character: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(flatten)]
    pub kind: AlertKind,
    #[serde(rename = "where")]
    pub location: MatchLocation,
    #[serde(rename = "match")]
    pub span: MatchSpan,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypoSuspect {
    pub expected: String,
    pub typed_in_doc: String,
    pub distance: usize,
    #[serde(rename = "where")]
    pub location: MatchLocation,
    #[serde(rename = "match")]
    pub span: MatchSpan,
    pub snippet: String,
}

/// Text normalization applied to every block and phrase: non-breaking spaces
/// become regular spaces, surrounding whitespace is trimmed.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_string()
}
