//! Core library for invoice line-item extraction.
//!
//! This crate provides:
//! - Text acquisition from plain text, PDF text layers and Tesseract OCR
//! - Line-item extraction with a sequential table parser and a regex fallback
//! - Header field, totals, contact and document type extraction
//! - Reconciliation of line items against the stated subtotal
//! - Rule-based cleanup of OCR artefacts
//!
//! [`process_document`] runs the whole chain for one file.

pub mod cleanup;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod source;

pub use cleanup::{CleanupService, RuleBasedCleanup};
pub use error::{ExtractionError, InvexError, PdfError, Result, SourceError};
pub use extract::{
    extract_line_items, DocumentExtractor, DocumentParser, LineItemExtractionEngine,
};
pub use models::config::InvexConfig;
pub use models::document::{
    Contacts, DocumentType, ExtractionResult, FieldValue, HeaderFields, LineItem,
    Reconciliation, StrategyKind, TotalKind, Totals,
};
pub use pipeline::process_document;
pub use source::{acquire_text, select_source, SourceOptions, SourceText, TextSource};
