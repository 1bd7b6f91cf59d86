//! Text acquisition for documents.
//!
//! A [`TextSource`] turns a file into plain text. Sources are synchronous and
//! never retry; callers that need a deadline wrap them.

mod plain;
#[cfg(feature = "pdf")]
mod pdf;
mod tesseract;

pub use plain::PlainTextSource;
#[cfg(feature = "pdf")]
pub use pdf::PdfTextSource;
pub use tesseract::TesseractSource;

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::models::config::SourceConfig;

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Text produced by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceText {
    /// Extracted text.
    pub text: String,
    /// Source confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Free-form details (`method`, `pages`, `engine`, ...).
    pub metadata: BTreeMap<String, String>,
}

impl SourceText {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Options shared by all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// OCR language code.
    pub language: String,
    /// Shorter text is treated as no text.
    pub min_text_length: usize,
    /// External programs still running after this long are killed.
    pub timeout: Option<Duration>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self::from(&SourceConfig::default())
    }
}

impl From<&SourceConfig> for SourceOptions {
    fn from(config: &SourceConfig) -> Self {
        Self {
            language: config.language.clone(),
            min_text_length: config.min_text_length,
            timeout: (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs)),
        }
    }
}

/// Trait for text acquisition backends.
pub trait TextSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Read the text of the document at `path`.
    fn extract(&self, path: &Path, options: &SourceOptions) -> Result<SourceText>;
}

/// Kinds of documents by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Image,
}

impl DocumentFormat {
    /// Classify `path` by its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" | "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" | "webp" => Ok(Self::Image),
            _ => Err(SourceError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext
            })),
        }
    }
}

/// Sources to try for `path`, in order.
///
/// PDFs use their text layer first (when enabled) and fall back to OCR.
pub fn source_chain(path: &Path, config: &SourceConfig) -> Result<Vec<Box<dyn TextSource>>> {
    let ocr = || -> Box<dyn TextSource> { Box::new(TesseractSource::new(&config.tesseract_binary)) };

    let chain: Vec<Box<dyn TextSource>> = match DocumentFormat::from_path(path)? {
        DocumentFormat::Text => vec![Box::new(PlainTextSource::new())],
        DocumentFormat::Image => vec![ocr()],
        #[cfg(feature = "pdf")]
        DocumentFormat::Pdf if config.prefer_pdf_text => {
            vec![Box::new(PdfTextSource::new()), ocr()]
        }
        DocumentFormat::Pdf => vec![ocr()],
    };
    Ok(chain)
}

/// Primary source for `path`.
pub fn select_source(path: &Path, config: &SourceConfig) -> Result<Box<dyn TextSource>> {
    source_chain(path, config)?
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::UnsupportedFormat(path.display().to_string()))
}

/// Acquire text for `path`, trying each source of the chain until one
/// produces text.
pub fn acquire_text(path: &Path, config: &SourceConfig) -> Result<SourceText> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let options = SourceOptions::from(config);
    let mut last_error = None;

    for source in source_chain(path, config)? {
        match source.extract(path, &options) {
            Ok(text) => {
                debug!(
                    "{} produced {} characters for {}",
                    source.name(),
                    text.text.len(),
                    path.display()
                );
                return Ok(text);
            }
            Err(e) => {
                warn!("{} failed for {}: {}", source.name(), path.display(), e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| SourceError::Empty(path.display().to_string())))
}

/// Reject text shorter than the configured minimum.
fn require_text(source: &str, text: String, min_len: usize) -> Result<String> {
    if text.trim().chars().count() < min_len.max(1) {
        return Err(SourceError::Empty(source.to_string()));
    }
    Ok(text)
}
