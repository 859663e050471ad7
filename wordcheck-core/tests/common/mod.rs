//! In-memory DOCX fixtures: just enough package parts for the reader.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#
);

const STYLES: &str = r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Runs for one paragraph; `\n` in the text becomes a `w:br`
fn runs(text: &str) -> String {
    text.split('\n')
        .map(|part| format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape(part)))
        .collect::<Vec<_>>()
        .join("<w:br/>")
}

pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r>{}</w:r></w:p>", runs(text))
}

pub fn heading(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r>{}</w:r></w:p>"#,
        runs(text)
    )
}

pub fn page_break_paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r>{}<w:br w:type="page"/></w:r></w:p>"#, runs(text))
}

/// A table; each inner slice is one row of single-paragraph cells
pub fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|c| format!("<w:tc>{}</w:tc>", paragraph(c)))
                .collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!("<w:tbl>{rows}</w:tbl>")
}

#[derive(Default)]
pub struct DocxBuilder {
    body: Vec<String>,
    header: Option<String>,
    footer: Option<String>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, xml: String) -> Self {
        self.body.push(xml);
        self
    }

    pub fn paragraph(self, text: &str) -> Self {
        self.push(paragraph(text))
    }

    pub fn header(mut self, text: &str) -> Self {
        self.header = Some(paragraph(text));
        self
    }

    pub fn footer(mut self, text: &str) -> Self {
        self.footer = Some(paragraph(text));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut sect = String::from("<w:sectPr>");
        let mut rels = String::new();
        if self.header.is_some() {
            sect.push_str(r#"<w:headerReference w:type="default" r:id="rIdHeader"/>"#);
            rels.push_str(r#"<Relationship Id="rIdHeader" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>"#);
        }
        if self.footer.is_some() {
            sect.push_str(r#"<w:footerReference w:type="default" r:id="rIdFooter"/>"#);
            rels.push_str(r#"<Relationship Id="rIdFooter" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>"#);
        }
        sect.push_str("</w:sectPr>");

        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {NAMESPACES}><w:body>{}{sect}</w:body></w:document>"#,
            self.body.concat()
        );

        let mut parts = vec![
            ("word/document.xml".to_string(), document),
            (
                "word/styles.xml".to_string(),
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:styles {NAMESPACES}>{STYLES}</w:styles>"#),
            ),
            (
                "word/_rels/document.xml.rels".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
                ),
            ),
        ];
        if let Some(header) = self.header {
            parts.push((
                "word/header1.xml".to_string(),
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:hdr {NAMESPACES}>{header}</w:hdr>"#),
            ));
        }
        if let Some(footer) = self.footer {
            parts.push((
                "word/footer1.xml".to_string(),
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><w:ftr {NAMESPACES}>{footer}</w:ftr>"#),
            ));
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(name, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}
