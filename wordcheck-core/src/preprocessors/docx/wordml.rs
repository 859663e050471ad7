//! WordprocessingML parsing for the parts of a DOCX package we read:
//! `styles.xml`, `document.xml.rels`, and story parts (`document.xml`,
//! headers, footers).
//!
//! Element names are matched by local name, so the usual `w:`/`r:`/`mc:`
//! prefixes are not assumed.
//!
//! Paragraph text follows Word's plain-text view:
//! - `w:t` runs are concatenated, `w:tab`/`w:ptab` give `\t`,
//!   `w:br`/`w:cr` give `\n`, `w:noBreakHyphen` gives `-`
//! - `w:br w:type="page"` adds no text but flags the paragraph
//! - drawings, VML pictures, embedded objects, text boxes and
//!   `mc:AlternateContent` are skipped as whole subtrees
//! - tables nested inside a table cell are skipped
//! - tracked changes are read as accepted: deleted and moved-away runs and
//!   the previous formatting stored in `*PrChange` elements are skipped

use crate::error::CheckError;
use crate::types::*;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Subtrees whose content is not part of the current document view
const SKIPPED_ELEMENTS: &[&[u8]] = &[
    b"drawing",
    b"pict",
    b"object",
    b"AlternateContent",
    b"txbxContent",
    // Tracked changes: old formatting and text that is no longer there
    b"pPrChange",
    b"rPrChange",
    b"sectPrChange",
    b"tblPrChange",
    b"trPrChange",
    b"tcPrChange",
    b"moveFrom",
    b"del",
];

/// Built-in style ids Word stores in lowercase but displays capitalized
const BUILTIN_LOWERCASE_STYLES: &[&str] = &[
    "normal", "heading", "title", "subtitle", "caption", "header", "footer", "body text",
    "list paragraph", "footnote text", "toc",
];

fn local(e: &BytesStart) -> Vec<u8> {
    e.local_name().as_ref().to_vec()
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Display name as Word shows it: "heading 1" becomes "Heading 1"
fn ui_style_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let builtin = BUILTIN_LOWERCASE_STYLES
        .iter()
        .any(|b| lowered == *b || lowered.starts_with(&format!("{b} ")));
    if builtin && name == lowered {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        name.to_string()
    }
}

// ===== STYLES =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Display name for a paragraph's style id. Paragraphs without a style,
    /// or pointing at an id the style sheet does not define, get the default
    /// paragraph style.
    pub fn resolve(&self, style_id: Option<&str>) -> Option<String> {
        style_id
            .and_then(|id| self.names.get(id).cloned())
            .or_else(|| self.default_paragraph.clone())
    }
}

pub fn parse_styles(xml: &str) -> Result<StyleSheet, CheckError> {
    const PART: &str = "word/styles.xml";
    let mut sheet = StyleSheet::default();
    let mut reader = Reader::from_str(xml);

    // (styleId, is default paragraph style, display name)
    let mut current: Option<(String, bool, Option<String>)> = None;

    loop {
        match reader.read_event().map_err(|e| CheckError::xml(PART, e))? {
            Event::Start(e) | Event::Empty(e) if local(&e) == b"style" => {
                if let Some(id) = attr(&e, b"styleId") {
                    let is_default = attr(&e, b"type").as_deref() == Some("paragraph")
                        && matches!(attr(&e, b"default").as_deref(), Some("1") | Some("true"));
                    current = Some((id, is_default, None));
                }
            }
            Event::Start(e) | Event::Empty(e) if local(&e) == b"name" => {
                if let Some((_, _, name)) = current.as_mut() {
                    *name = attr(&e, b"val");
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"style" => {
                if let Some((id, is_default, name)) = current.take() {
                    let display = ui_style_name(name.as_deref().unwrap_or(&id));
                    if is_default {
                        sheet.default_paragraph = Some(display.clone());
                    }
                    sheet.names.insert(id, display);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(sheet)
}

// ===== RELATIONSHIPS =====

/// Relationship id → package path (e.g. `rId7` → `word/header1.xml`)
pub fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, CheckError> {
    const PART: &str = "word/_rels/document.xml.rels";
    let mut targets = HashMap::new();
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event().map_err(|e| CheckError::xml(PART, e))? {
            Event::Start(e) | Event::Empty(e) if local(&e) == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    targets.insert(id, package_path(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

fn package_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{target}"),
    }
}

// ===== STORIES =====

/// Default header/footer relationship ids declared by one `w:sectPr`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRefs {
    pub header: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Story {
    pub items: Vec<SourceItem>,
    /// One entry per `w:sectPr`, in document order
    pub sections: Vec<SectionRefs>,
}

impl Story {
    /// Top-level paragraphs only, as used for header and footer parts
    pub fn paragraphs(self) -> Vec<SourceParagraph> {
        self.items
            .into_iter()
            .filter_map(|item| match item {
                SourceItem::Paragraph(p) => Some(p),
                SourceItem::Table(_) => None,
            })
            .collect()
    }
}

#[derive(Default)]
struct ParagraphBuilder {
    text: String,
    style_id: Option<String>,
    has_page_break: bool,
}

struct StoryParser<'s> {
    styles: &'s StyleSheet,
    story: Story,
    skip_depth: usize,
    table: Option<SourceTable>,
    paragraph: Option<ParagraphBuilder>,
    section: Option<SectionRefs>,
    in_run: bool,
    in_text: bool,
}

impl<'s> StoryParser<'s> {
    fn new(styles: &'s StyleSheet) -> Self {
        Self {
            styles,
            story: Story::default(),
            skip_depth: 0,
            table: None,
            paragraph: None,
            section: None,
            in_run: false,
            in_text: false,
        }
    }

    fn start(&mut self, e: &BytesStart) {
        let name = local(e);
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }
        if SKIPPED_ELEMENTS.contains(&name.as_slice()) {
            self.skip_depth = 1;
            return;
        }
        match name.as_slice() {
            b"p" => self.paragraph = Some(ParagraphBuilder::default()),
            b"r" => self.in_run = true,
            b"t" => self.in_text = self.paragraph.is_some() && self.in_run,
            b"tbl" if self.table.is_some() => self.skip_depth = 1,
            b"tbl" => self.table = Some(SourceTable::default()),
            b"tr" => {
                if let Some(table) = self.table.as_mut() {
                    table.rows.push(SourceRow::default());
                }
            }
            b"tc" => {
                if let Some(row) = self.table.as_mut().and_then(|t| t.rows.last_mut()) {
                    row.cells.push(SourceCell::default());
                }
            }
            b"sectPr" => self.section = Some(SectionRefs::default()),
            _ => self.inline(e, &name),
        }
    }

    fn empty(&mut self, e: &BytesStart) {
        if self.skip_depth > 0 {
            return;
        }
        let name = local(e);
        match name.as_slice() {
            b"p" => {
                self.paragraph = Some(ParagraphBuilder::default());
                self.finish_paragraph();
            }
            b"sectPr" => self.story.sections.push(SectionRefs::default()),
            _ => self.inline(e, &name),
        }
    }

    /// Leaf elements that may appear either as empty or as start tags
    fn inline(&mut self, e: &BytesStart, name: &[u8]) {
        match name {
            b"pStyle" => {
                if let Some(p) = self.paragraph.as_mut() {
                    p.style_id = attr(e, b"val");
                }
            }
            b"headerReference" | b"footerReference" => {
                let is_default = attr(e, b"type").map_or(true, |t| t == "default");
                if let (Some(section), true) = (self.section.as_mut(), is_default) {
                    let id = attr(e, b"id");
                    if name == b"headerReference" {
                        section.header = id;
                    } else {
                        section.footer = id;
                    }
                }
            }
            _ if !self.in_run => {}
            b"tab" | b"ptab" => self.push_text("\t"),
            b"cr" => self.push_text("\n"),
            b"noBreakHyphen" => self.push_text("-"),
            b"br" => {
                if attr(e, b"type").as_deref() == Some("page") {
                    if let Some(p) = self.paragraph.as_mut() {
                        p.has_page_break = true;
                    }
                } else {
                    self.push_text("\n");
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }
        match name {
            b"p" => self.finish_paragraph(),
            b"r" => self.in_run = false,
            b"t" => self.in_text = false,
            b"tbl" => {
                if let Some(table) = self.table.take() {
                    self.story.items.push(SourceItem::Table(table));
                }
            }
            b"sectPr" => {
                if let Some(section) = self.section.take() {
                    self.story.sections.push(section);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, s: &str) {
        if let Some(p) = self.paragraph.as_mut() {
            p.text.push_str(s);
        }
    }

    fn finish_paragraph(&mut self) {
        let Some(builder) = self.paragraph.take() else {
            return;
        };
        self.in_run = false;
        self.in_text = false;
        let paragraph = SourceParagraph {
            text: builder.text,
            style_name: self.styles.resolve(builder.style_id.as_deref()),
            has_page_break: builder.has_page_break,
        };
        match self.table.as_mut() {
            Some(table) => {
                if let Some(cell) = table.rows.last_mut().and_then(|r| r.cells.last_mut()) {
                    cell.paragraphs.push(paragraph);
                }
            }
            None => self.story.items.push(SourceItem::Paragraph(paragraph)),
        }
    }
}

/// Parse a story part into body items and section references
pub fn parse_story(part: &str, xml: &str, styles: &StyleSheet) -> Result<Story, CheckError> {
    let mut reader = Reader::from_str(xml);
    let mut parser = StoryParser::new(styles);

    loop {
        match reader.read_event().map_err(|e| CheckError::xml(part, e))? {
            Event::Start(e) => parser.start(&e),
            Event::Empty(e) => parser.empty(&e),
            Event::End(e) => parser.end(e.local_name().as_ref()),
            Event::Text(t) if parser.in_text && parser.skip_depth == 0 => {
                let text = t.unescape().map_err(|e| CheckError::xml(part, e))?;
                parser.push_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(parser.story)
}
