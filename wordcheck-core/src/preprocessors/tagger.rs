use crate::types::*;

/// Turns a SourceDocument into location-annotated Blocks in traversal order:
/// body paragraphs and table cell paragraphs first, then each section's
/// header and footer paragraphs.
///
/// Counters:
/// - `page_est` starts at 1 and advances after any body block that contains
///   an explicit page break. Header/footer blocks carry no page estimate.
/// - Body paragraphs and table cell paragraphs share one paragraph counter.
/// - Tables are numbered by appearance; rows, columns and cell paragraphs are
///   1-based within their parent.
#[derive(Debug, Default)]
pub struct LocationTagger {
    page: u32,
    paragraph_index: u32,
    table_index: u32,
    blocks: Vec<Block>,
}

impl LocationTagger {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Default::default()
        }
    }

    /// Tag a whole document. Blocks with empty text are kept so indices stay
    /// aligned with the source.
    pub fn tag_document(doc: &SourceDocument, scan_headers_footers: bool) -> Vec<Block> {
        let mut tagger = Self::new();
        for item in &doc.body {
            match item {
                SourceItem::Paragraph(p) => tagger.push_body_paragraph(p),
                SourceItem::Table(t) => tagger.push_table(t),
            }
        }
        if scan_headers_footers {
            for (index, section) in doc.sections.iter().enumerate() {
                let section_number = index as u32 + 1;
                tagger.push_story(Area::Header, section_number, &section.header);
                tagger.push_story(Area::Footer, section_number, &section.footer);
            }
        }
        tagger.blocks
    }

    fn push_body_paragraph(&mut self, paragraph: &SourceParagraph) {
        self.paragraph_index += 1;
        let indices = StructuralIndices {
            paragraph_index: Some(self.paragraph_index),
            ..Default::default()
        };
        self.push_body(paragraph, BlockKind::Paragraph, indices);
    }

    fn push_table(&mut self, table: &SourceTable) {
        self.table_index += 1;
        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.cells.iter().enumerate() {
                for (p, paragraph) in cell.paragraphs.iter().enumerate() {
                    self.paragraph_index += 1;
                    let indices = StructuralIndices {
                        table_index: Some(self.table_index),
                        row: Some(r as u32 + 1),
                        col: Some(c as u32 + 1),
                        cell_paragraph_index: Some(p as u32 + 1),
                        global_paragraph_index: Some(self.paragraph_index),
                        ..Default::default()
                    };
                    self.push_body(paragraph, BlockKind::TableCell, indices);
                }
            }
        }
    }

    fn push_body(&mut self, paragraph: &SourceParagraph, kind: BlockKind, indices: StructuralIndices) {
        self.blocks.push(Block {
            text: clean_text(&paragraph.text),
            location: Location {
                area: Area::Body,
                kind,
                page_est: Some(self.page),
                indices,
                style_name: paragraph.style_name.clone(),
            },
        });
        if paragraph.has_page_break {
            self.page += 1;
        }
    }

    fn push_story(&mut self, area: Area, section: u32, paragraphs: &[SourceParagraph]) {
        for (index, paragraph) in paragraphs.iter().enumerate() {
            self.blocks.push(Block {
                text: clean_text(&paragraph.text),
                location: Location {
                    area,
                    kind: BlockKind::Paragraph,
                    page_est: None,
                    indices: StructuralIndices {
                        section: Some(section),
                        paragraph_index: Some(index as u32 + 1),
                        ..Default::default()
                    },
                    style_name: paragraph.style_name.clone(),
                },
            });
        }
    }
}
