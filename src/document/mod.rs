// src/document/mod.rs
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::utils::error::DocumentError;

/// One uploaded file: its identifying name and raw bytes.
///
/// Consumed once per processing pass; only the extracted text survives.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Reads a document from disk, naming it after its file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::debug!("Read document {} ({} bytes)", name, bytes.len());
        Ok(Self { name, bytes })
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

/// Produces the concatenated page text of a document.
pub trait TextExtractor {
    fn extract_text(&self, document: &Document) -> Result<String, DocumentError>;
}

/// Text extraction backed by `pdf_extract`, with plain-text passthrough for
/// `.txt` files that already hold extracted page text.
#[derive(Debug, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, document: &Document) -> Result<String, DocumentError> {
        let text = match document.extension().as_deref() {
            Some("pdf") => {
                let pages = extract_pages(&document.bytes)?;
                tracing::debug!("{}: {} pages extracted", document.name, pages.len());
                join_pages(&pages)
            }
            Some("txt") => String::from_utf8_lossy(&document.bytes).into_owned(),
            other => {
                return Err(DocumentError::Unsupported(format!(
                    "{} (extension {:?})",
                    document.name, other
                )))
            }
        };

        if text.trim().is_empty() {
            return Err(DocumentError::Empty(document.name.clone()));
        }
        Ok(text)
    }
}

/// Extracts one string per page. `pdf_extract` can panic on malformed input,
/// so the call runs behind an unwind boundary.
fn extract_pages(data: &[u8]) -> Result<Vec<String>, DocumentError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(DocumentError::Pdf(e.to_string())),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(DocumentError::Panicked(message))
        }
    }
}

/// Trims trailing whitespace from every line and joins the pages with a
/// newline, skipping pages with no text.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| {
            page.lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
