//! Text extraction from PDF, DOCX and plain text documents
//!
//! Extractors work on byte buffers; reading the file is the caller's job.
//! A document that cannot be opened at all is an error, while a single page
//! or paragraph that fails is logged and contributes empty text.

use crate::error::{Result, ResumeScannerError};
use crate::input::file_detector::FileType;
use log::{debug, warn};
use regex::Regex;
use std::fmt::Display;
use std::io::{Cursor, Read};

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Extract text from a document whose format was derived from its name.
pub fn extract_text(bytes: &[u8], file_type: FileType) -> Result<String> {
    if bytes.is_empty() {
        debug!("Empty {} document, nothing to extract", file_type);
        return Ok(String::new());
    }

    match file_type {
        FileType::Pdf => PdfExtractor.extract(bytes),
        FileType::Docx => DocxExtractor::new().extract(bytes),
        FileType::Text => PlainTextExtractor.extract(bytes),
    }
}

/// Collects one text contribution per page or paragraph.
///
/// A failed unit is recorded as an empty string so unit order is kept.
#[derive(Debug)]
pub struct UnitAccumulator {
    unit_name: &'static str,
    units: Vec<String>,
    failures: usize,
}

impl UnitAccumulator {
    pub fn new(unit_name: &'static str) -> Self {
        Self {
            unit_name,
            units: Vec::new(),
            failures: 0,
        }
    }

    pub fn record<E: Display>(&mut self, result: std::result::Result<String, E>) {
        match result {
            Ok(text) => self.units.push(text),
            Err(e) => {
                warn!(
                    "Could not extract {} {}: {}",
                    self.unit_name,
                    self.units.len() + 1,
                    e
                );
                self.failures += 1;
                self.units.push(String::new());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// True when no unit produced anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.units.iter().all(|unit| unit.trim().is_empty())
    }

    /// Join all contributions with newline separators, in unit order.
    pub fn finish(self) -> String {
        if self.failures > 0 {
            debug!(
                "{} of {} {}s contributed no text",
                self.failures,
                self.units.len(),
                self.unit_name
            );
        }
        self.units.join("\n")
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| ResumeScannerError::PdfExtraction(format!("Failed to open PDF: {}", e)))?;

        // pdf-extract decrypts empty-password documents
        if doc.is_encrypted() {
            debug!("PDF is encrypted, using whole-document extraction");
            return Self::extract_whole_document(bytes);
        }

        let pages = Self::extract_pages(&doc);
        if pages.is_empty() || !pages.is_blank() {
            return Ok(pages.finish());
        }

        debug!("All {} PDF pages came back blank, retrying whole-document extraction", pages.len());
        match Self::extract_whole_document(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("{}", e);
                Ok(pages.finish())
            }
        }
    }
}

impl PdfExtractor {
    fn extract_pages(doc: &lopdf::Document) -> UnitAccumulator {
        let mut pages = UnitAccumulator::new("page");
        for page_number in doc.get_pages().into_keys() {
            pages.record(doc.extract_text(&[page_number]));
        }
        debug!("Extracted {} PDF pages", pages.len());
        pages
    }

    fn extract_whole_document(bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ResumeScannerError::PdfExtraction(format!("Whole-document extraction failed: {}", e)))
    }
}

pub struct DocxExtractor {
    paragraph_tag_regex: Regex,
    run_regex: Regex,
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxExtractor {
    pub fn new() -> Self {
        // `<w:p>`, `<w:p w:rsidR=..>`, `<w:p/>` and `</w:p>`, but not `<w:pPr>`
        let paragraph_tag_regex =
            Regex::new(r"<w:p(?:\s[^>]*)?/?>|</w:p>").expect("Invalid paragraph tag regex");

        let run_regex = Regex::new(
            r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab\s*/>|<w:br(?:\s[^>]*)?/>|<w:cr\s*/>",
        )
        .expect("Invalid run regex");

        Self {
            paragraph_tag_regex,
            run_regex,
        }
    }

    /// Split `word/document.xml` into paragraph texts, one per top-level `<w:p>`.
    ///
    /// Paragraphs nested inside a top-level one (text boxes) are part of its text.
    pub fn paragraphs(&self, xml: &str) -> UnitAccumulator {
        let mut paragraphs = UnitAccumulator::new("paragraph");
        let mut depth = 0usize;
        let mut start = 0usize;

        for tag in self.paragraph_tag_regex.find_iter(xml) {
            let tag_text = tag.as_str();
            if tag_text.starts_with("</") {
                if depth == 0 {
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    paragraphs.record(self.paragraph_text(&xml[start..tag.end()]));
                }
            } else if tag_text.ends_with("/>") {
                if depth == 0 {
                    paragraphs.record::<String>(Ok(String::new()));
                }
            } else {
                if depth == 0 {
                    start = tag.start();
                }
                depth += 1;
            }
        }

        paragraphs
    }

    fn paragraph_text(&self, paragraph_xml: &str) -> std::result::Result<String, String> {
        let mut text = String::new();

        for cap in self.run_regex.captures_iter(paragraph_xml) {
            match cap.get(1) {
                Some(run) => text.push_str(&decode_xml_entities(run.as_str())?),
                None if cap[0].starts_with("<w:tab") => text.push('\t'),
                None => text.push('\n'),
            }
        }

        Ok(text)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            ResumeScannerError::DocxExtraction(format!("Not a DOCX archive: {}", e))
        })?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| {
                ResumeScannerError::DocxExtraction(format!("Missing word/document.xml: {}", e))
            })?
            .read_to_string(&mut xml)
            .map_err(|e| {
                ResumeScannerError::DocxExtraction(format!("Unreadable word/document.xml: {}", e))
            })?;

        let paragraphs = self.paragraphs(&xml);
        debug!("Extracted {} DOCX paragraphs", paragraphs.len());
        Ok(paragraphs.finish())
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Decode the five predefined XML entities and numeric character references.
fn decode_xml_entities(raw: &str) -> std::result::Result<String, String> {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| format!("unterminated entity in {:?}", raw))?;
        let name = &after[..semi];

        let ch = match name {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = name.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| format!("unknown entity &{};", name))?
            }
        };

        decoded.push(ch);
        rest = &after[semi + 1..];
    }

    decoded.push_str(rest);
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn wrap_body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            paragraphs
        )
    }

    #[test]
    fn test_empty_bytes_yield_empty_text_for_every_format() {
        for file_type in [FileType::Pdf, FileType::Docx, FileType::Text] {
            assert_eq!(extract_text(&[], file_type).unwrap(), "");
        }
    }

    #[test]
    fn test_plain_text_is_decoded_leniently() {
        let bytes = b"Python \xff\xfe developer";
        let text = extract_text(bytes, FileType::Text).unwrap();
        assert!(text.starts_with("Python "));
        assert!(text.ends_with(" developer"));
    }

    #[test]
    fn test_docx_paragraphs_joined_in_order() {
        let xml = wrap_body(concat!(
            r#"<w:p w:rsidR="00A1"><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Rust &amp; C++</w:t></w:r></w:p>"#,
        ));
        let text = DocxExtractor::new().extract(&build_docx(&xml)).unwrap();
        assert_eq!(text, "Jane Doe\n\nSkills: Rust & C++");
    }

    #[test]
    fn test_docx_tabs_and_breaks() {
        let xml = wrap_body(r#"<w:p><w:r><w:t>Python</w:t><w:tab/><w:t>SQL</w:t><w:br/><w:t>Docker</w:t></w:r></w:p>"#);
        let text = DocxExtractor::new().extract(&build_docx(&xml)).unwrap();
        assert_eq!(text, "Python\tSQL\nDocker");
    }

    #[test]
    fn test_docx_bad_paragraph_contributes_empty_text() {
        let extractor = DocxExtractor::new();
        let xml = wrap_body(concat!(
            r#"<w:p><w:r><w:t>First</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Broken &bogus; entity</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Third</w:t></w:r></w:p>"#,
        ));

        let paragraphs = extractor.paragraphs(&xml);
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs.failures(), 1);
        assert_eq!(paragraphs.finish(), "First\n\nThird");
    }

    #[test]
    fn test_docx_not_an_archive_is_an_error() {
        let result = extract_text(b"definitely not a zip", FileType::Docx);
        assert!(matches!(result, Err(ResumeScannerError::DocxExtraction(_))));
    }

    #[test]
    fn test_docx_without_document_part_is_an_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file("docProps/core.xml", options).unwrap();
        writer.write_all(b"<coreProperties/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = DocxExtractor::new().extract(&bytes);
        assert!(matches!(result, Err(ResumeScannerError::DocxExtraction(_))));
    }

    #[test]
    fn test_pdf_garbage_is_an_error() {
        let result = extract_text(b"%PDF-1.4 this is not really a pdf", FileType::Pdf);
        assert!(matches!(result, Err(ResumeScannerError::PdfExtraction(_))));
    }

    /// One page per entry; an empty entry gives a page without text operators.
    fn build_pdf(page_lines: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in page_lines {
            let operations = if line.is_empty() {
                vec![Operation::new("q", vec![]), Operation::new("Q", vec![])]
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_pages_extracted_in_order() {
        let bytes = build_pdf(&["Python developer", "Docker and Kubernetes"]);

        let text = extract_text(&bytes, FileType::Pdf).unwrap();
        let first = text.find("Python developer").unwrap();
        let second = text.find("Docker and Kubernetes").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_pdf_without_text_is_empty_not_an_error() {
        // every page blank, so the whole-document pass runs and also finds nothing
        let bytes = build_pdf(&["", ""]);

        let text = extract_text(&bytes, FileType::Pdf).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_docx_text_box_keeps_surrounding_runs() {
        let xml = wrap_body(concat!(
            r#"<w:p><w:r><w:t>Before box</w:t></w:r>"#,
            r#"<w:r><w:pict><v:shape><v:textbox><w:txbxContent>"#,
            r#"<w:p><w:r><w:t xml:space="preserve"> Inside box</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></v:textbox></v:shape></w:pict></w:r>"#,
            r#"<w:r><w:t xml:space="preserve"> after box</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Next paragraph</w:t></w:r></w:p>"#,
        ));

        let paragraphs = DocxExtractor::new().paragraphs(&xml);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs.finish(), "Before box Inside box after box\nNext paragraph");
    }

    #[test]
    fn test_docx_stray_closing_tag_is_ignored() {
        let xml = wrap_body(r#"</w:p><w:p><w:r><w:t>Only</w:t></w:r></w:p>"#);
        let text = DocxExtractor::new().extract(&build_docx(&xml)).unwrap();
        assert_eq!(text, "Only");
    }

    #[test]
    fn test_accumulator_keeps_unit_positions() {
        let mut pages = UnitAccumulator::new("page");
        pages.record::<String>(Ok("one".to_string()));
        pages.record(Err("corrupt content stream"));
        pages.record::<String>(Ok("three".to_string()));
        assert_eq!(pages.failures(), 1);
        assert_eq!(pages.finish(), "one\n\nthree");
    }

    #[test]
    fn test_accumulator_blank_detection() {
        let mut pages = UnitAccumulator::new("page");
        pages.record::<String>(Ok("  \n".to_string()));
        pages.record(Err("corrupt content stream"));
        assert!(pages.is_blank());

        pages.record::<String>(Ok("Rust".to_string()));
        assert!(!pages.is_blank());
    }

    #[test]
    fn test_entity_decoding() {
        assert_eq!(decode_xml_entities("a &lt;b&gt; &#65;&#x42;").unwrap(), "a <b> AB");
        assert!(decode_xml_entities("AT&T").is_err());
        assert!(decode_xml_entities("&nbsp;").is_err());
    }
}
