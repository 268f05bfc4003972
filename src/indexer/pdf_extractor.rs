use crate::error::IngestionError;
use lopdf::{Dictionary, Document, Object};
use std::panic;
use std::path::Path;

/// Raw text and document info pulled out of one PDF
#[derive(Debug, Clone, Default)]
pub struct ExtractedPdf {
    /// Filename without directory
    pub source: String,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Text of each physical page; `pages[0]` is page 1
    pub pages: Vec<String>,
}

impl ExtractedPdf {
    pub fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }
}

/// Extract page texts and `/Info` metadata from a PDF file
pub fn extract_pdf(path: &Path) -> Result<ExtractedPdf, IngestionError> {
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = std::fs::read(path).map_err(|e| IngestionError::ReadFailed {
        file: source.clone(),
        reason: e.to_string(),
    })?;

    extract_pdf_from_bytes(source, &bytes)
}

/// Extract page texts and `/Info` metadata from PDF bytes
pub fn extract_pdf_from_bytes(
    source: impl Into<String>,
    bytes: &[u8],
) -> Result<ExtractedPdf, IngestionError> {
    let source = source.into();

    // pdf-extract panics on some malformed inputs instead of returning an error
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| IngestionError::ParseFailed {
            file: source.clone(),
            reason: "text extractor aborted on malformed content".to_string(),
        })?
        .map_err(|e| IngestionError::ParseFailed {
            file: source.clone(),
            reason: e.to_string(),
        })?;

    let (title, author) = panic::catch_unwind(|| read_document_info(bytes)).unwrap_or_else(|_| {
        tracing::warn!(source = %source, "Document info parser aborted, using filename as title");
        (None, None)
    });

    tracing::debug!(
        source = %source,
        pages = pages.len(),
        has_title = title.is_some(),
        "Extracted PDF"
    );

    Ok(ExtractedPdf {
        source,
        title,
        author,
        pages,
    })
}

/// Read `Title` and `Author` from the trailer's `/Info` dictionary, if any
fn read_document_info(bytes: &[u8]) -> (Option<String>, Option<String>) {
    let Ok(document) = Document::load_mem(bytes) else {
        return (None, None);
    };

    let info = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|object| match object {
            Object::Reference(id) => document.get_dictionary(*id).ok(),
            Object::Dictionary(dictionary) => Some(dictionary),
            _ => None,
        });

    match info {
        Some(info) => (info_string(info, b"Title"), info_string(info, b"Author")),
        None => (None, None),
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    match info.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = decode_pdf_string(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// otherwise one byte per character
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    bytes.iter().map(|&b| b as char).collect()
}
