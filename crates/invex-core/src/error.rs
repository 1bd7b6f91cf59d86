//! Error types for the invex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Text acquisition error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Document extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or written.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while acquiring text for a document.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document does not exist.
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No text source handles this kind of document.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The source ran but produced no text.
    #[error("no text produced by {0}")]
    Empty(String),

    /// An external OCR program failed.
    #[error("{program} failed: {message}")]
    Command { program: String, message: String },

    /// PDF text layer could not be read.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to document extraction.
///
/// Heuristic misses (no table region, unparseable numbers, items that never
/// receive a total) are not errors; they surface as empty or partial results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The text source produced no usable text.
    #[error("no usable text for document {source_id}")]
    SourceUnavailable { source_id: String },
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
