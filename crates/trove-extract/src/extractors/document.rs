//! Text-document extractor: PDF, DOCX, PPTX, Markdown, plain text.

use crate::error::{ExtractError, ExtractResult};
use crate::extractor::{require_nonempty, Extraction, Extractor, SourceInput};
use pulldown_cmark::{Event, Parser, Tag};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Cap on a single decompressed OOXML entry, to guard against zip bombs.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extractor for document formats. Concatenates textual content across
/// pages, slides, and paragraphs in reading order; structural markup is
/// flattened to plain text.
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pdf(&self, path: &Path, origin: &str) -> ExtractResult<Extraction> {
        let content = pdf_extract::extract_text(path)
            .map_err(|e| ExtractError::failed(origin, format!("unreadable PDF: {}", e)))?;

        let pages = content.matches('\x0C').count().max(1);
        let text = clean_pdf_text(&content);

        debug!("Extracted {} characters from PDF", text.len());

        Ok(Extraction::new(
            text,
            serde_json::json!({ "format": "pdf", "pages": pages }),
        ))
    }

    fn extract_docx(&self, path: &Path, origin: &str) -> ExtractResult<Extraction> {
        let bytes = std::fs::read(path)?;
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.as_slice()))
            .map_err(|e| ExtractError::failed(origin, format!("unreadable DOCX: {}", e)))?;

        let xml = read_zip_entry(&mut archive, "word/document.xml")
            .map_err(|e| ExtractError::failed(origin, e))?;

        let text = flatten_ooxml_runs(&xml, b"p")
            .map_err(|e| ExtractError::failed(origin, format!("malformed DOCX XML: {}", e)))?;

        let paragraphs = text.lines().filter(|l| !l.trim().is_empty()).count();

        Ok(Extraction::new(
            text.trim().to_string(),
            serde_json::json!({ "format": "docx", "paragraphs": paragraphs }),
        ))
    }

    fn extract_pptx(&self, path: &Path, origin: &str) -> ExtractResult<Extraction> {
        let bytes = std::fs::read(path)?;
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.as_slice()))
            .map_err(|e| ExtractError::failed(origin, format!("unreadable PPTX: {}", e)))?;

        // Slides are numbered; keep reading order
        let mut slide_names: Vec<String> = archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .map(|s| s.to_string())
            .collect();
        slide_names.sort_by_key(|name| {
            name.trim_start_matches("ppt/slides/slide")
                .trim_end_matches(".xml")
                .parse::<u32>()
                .unwrap_or(u32::MAX)
        });

        let slide_count = slide_names.len();
        let mut out = String::new();
        for name in slide_names {
            let xml = read_zip_entry(&mut archive, &name)
                .map_err(|e| ExtractError::failed(origin, e))?;
            let text = flatten_ooxml_runs(&xml, b"p")
                .map_err(|e| ExtractError::failed(origin, format!("malformed PPTX XML: {}", e)))?;
            if !out.is_empty() && !text.trim().is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(text.trim());
        }

        Ok(Extraction::new(
            out.trim().to_string(),
            serde_json::json!({ "format": "pptx", "slides": slide_count }),
        ))
    }

    fn extract_markdown(&self, path: &Path) -> ExtractResult<Extraction> {
        let content = read_lossy(path)?;
        let text = flatten_markdown(&content);

        Ok(Extraction::new(
            text,
            serde_json::json!({ "format": "markdown", "original_length": content.len() }),
        ))
    }

    fn extract_plain(&self, path: &Path) -> ExtractResult<Extraction> {
        let content = read_lossy(path)?;
        let lines = content.lines().count();

        Ok(Extraction::new(
            content.trim().to_string(),
            serde_json::json!({ "format": "text", "lines": lines }),
        ))
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for DocumentExtractor {
    fn extract(&self, input: &SourceInput) -> ExtractResult<Extraction> {
        let origin = input.origin();
        let path = input
            .path()
            .ok_or_else(|| ExtractError::failed(&origin, "document extractor needs a file"))?;

        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }
        require_nonempty(path, &origin)?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => self.extract_pdf(path, &origin),
            "docx" => self.extract_docx(path, &origin),
            "pptx" => self.extract_pptx(path, &origin),
            "md" => self.extract_markdown(path),
            _ => self.extract_plain(path),
        }
    }
}

fn read_lossy(path: &Path) -> ExtractResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Collapse repeated blank lines and turn page breaks into separators.
fn clean_pdf_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .fold(Vec::new(), |mut acc, line| {
            let last_was_empty = acc.last().map(|s: &String| s.is_empty()).unwrap_or(false);
            if !(line.is_empty() && last_was_empty) {
                acc.push(line.to_string());
            }
            acc
        })
        .join("\n")
        .replace('\x0C', "\n\n")
        .trim()
        .to_string()
}

/// Read one entry from an OOXML archive with a size bound.
fn read_zip_entry(
    archive: &mut zip::ZipArchive<std::io::Cursor<&[u8]>>,
    name: &str,
) -> Result<Vec<u8>, String> {
    let entry = archive
        .by_name(name)
        .map_err(|e| format!("{} not found: {}", name, e))?;
    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(|e| format!("failed to read {}: {}", name, e))?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(format!("{} exceeds size limit", name));
    }
    Ok(out)
}

/// Pull the text runs (`<w:t>` / `<a:t>`) out of OOXML, inserting a
/// newline at each `break_on` element so paragraph order survives.
fn flatten_ooxml_runs(xml: &[u8], break_on: &[u8]) -> Result<String, String> {
    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(quick_xml::events::Event::Text(te)) if in_text_run => {
                out.push_str(te.unescape().map_err(|e| e.to_string())?.as_ref());
            }
            Ok(quick_xml::events::Event::End(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = false;
                } else if e.local_name().as_ref() == break_on && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// Flatten markdown to plain text, keeping headings and list items as lines.
fn flatten_markdown(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut text = String::new();

    for event in parser {
        match event {
            Event::End(Tag::Heading(..)) | Event::End(Tag::Paragraph) => {
                text.push_str("\n\n");
            }
            Event::Start(Tag::Item) => {
                text.push_str("- ");
            }
            Event::End(Tag::Item) => {
                text.push('\n');
            }
            Event::End(Tag::List(_)) => {
                text.push('\n');
            }
            Event::Text(t) => {
                text.push_str(&t);
            }
            Event::Code(code) => {
                text.push_str(&code);
            }
            Event::SoftBreak | Event::HardBreak => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text.trim().to_string()
}
