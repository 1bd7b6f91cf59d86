//! PDF text layer extraction using lopdf and pdf-extract.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use crate::error::PdfError;

use super::{require_text, Result, SourceOptions, SourceText, TextSource};

/// Confidence reported for text read from a PDF text layer.
const PDF_TEXT_CONFIDENCE: f32 = 0.90;

/// Reads the embedded text layer of digital PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

/// Text and page count of a loaded PDF.
#[derive(Debug, Clone)]
pub struct PdfText {
    pub text: String,
    pub pages: usize,
}

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }

    /// Load a PDF from bytes and read its text.
    ///
    /// Encrypted documents are decrypted with the empty password; anything
    /// else is rejected as [`PdfError::Encrypted`].
    pub fn read_mem(&self, data: &[u8]) -> std::result::Result<PdfText, PdfError> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let decrypted;
        let bytes = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut buf = Vec::new();
            doc.save_to(&mut buf)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted = buf;
            decrypted.as_slice()
        } else {
            data
        };

        let pages = doc.get_pages().len();
        if pages == 0 {
            return Err(PdfError::NoPages);
        }
        debug!("Loaded PDF with {} pages", pages);

        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        Ok(PdfText { text, pages })
    }
}

impl TextSource for PdfTextSource {
    fn name(&self) -> &str {
        "pdf_text"
    }

    fn extract(&self, path: &Path, options: &SourceOptions) -> Result<SourceText> {
        let data = std::fs::read(path)?;
        let PdfText { text, pages } = self.read_mem(&data)?;
        let text = require_text(self.name(), text, options.min_text_length)?;

        Ok(SourceText::new(text, PDF_TEXT_CONFIDENCE)
            .with_metadata("method", "pdf_text")
            .with_metadata("pages", pages.to_string()))
    }
}
