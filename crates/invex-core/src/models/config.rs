//! Configuration structures for the extraction pipeline.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvexError;
use crate::extract::LineItemExtractionEngine;
use crate::Result;

/// Main configuration for the invex pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// Text source configuration.
    pub source: SourceConfig,

    /// Cleanup stage configuration.
    pub cleanup: CleanupConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Document extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Below this many sequentially assembled items the pattern strategy is tried.
    pub min_sequential_items: usize,

    /// Allowed difference between summed item totals and the stated subtotal.
    pub reconciliation_tolerance: Decimal,

    /// Classify the document by keyword indicators.
    pub detect_document_type: bool,

    /// Collect e-mail addresses, phone numbers and URLs.
    pub extract_contacts: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_sequential_items: 5,
            reconciliation_tolerance: Decimal::new(1, 2),
            detect_document_type: true,
            extract_contacts: true,
        }
    }
}

/// Text source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Read the PDF text layer instead of running OCR on PDFs.
    pub prefer_pdf_text: bool,

    /// Minimum text length to accept a PDF text layer.
    pub min_text_length: usize,

    /// Tesseract executable.
    pub tesseract_binary: String,

    /// OCR language.
    pub language: String,

    /// Seconds allowed for acquiring text from one document.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            prefer_pdf_text: true,
            min_text_length: 50,
            tesseract_binary: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Cleanup stage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Run the rule-based cleanup after extraction.
    pub enabled: bool,

    /// Fix stand-alone OCR glyph confusions (`rn` read for `m`).
    pub fix_ocr_patterns: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            fix_ocr_patterns: true,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Documents processed concurrently.
    pub jobs: usize,

    /// Keep going when a document fails.
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            continue_on_error: false,
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| InvexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| InvexError::Config(format!("{}: {}", path.display(), e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Line-item engine honouring the configured threshold.
    pub fn extraction_engine(&self) -> LineItemExtractionEngine {
        LineItemExtractionEngine::new().with_min_sequential_items(self.extraction.min_sequential_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InvexConfig::default();
        assert_eq!(config.extraction.min_sequential_items, 5);
        assert_eq!(config.extraction.reconciliation_tolerance, Decimal::new(1, 2));
        assert_eq!(config.source.timeout_secs, 60);
        assert!(!config.cleanup.enabled);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: InvexConfig =
            serde_json::from_str(r#"{"extraction": {"min_sequential_items": 3}}"#).unwrap();
        assert_eq!(config.extraction.min_sequential_items, 3);
        assert!(config.extraction.detect_document_type);
        assert_eq!(config.batch.jobs, 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvexConfig::default();
        config.cleanup.enabled = true;
        config.save(&path).unwrap();

        let loaded = InvexConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"batch": {"jobs": "many"}}"#).unwrap();

        let err = InvexConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, InvexError::Config(ref msg) if msg.contains("config.json")));

        let missing = InvexConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, InvexError::Io(_)));
    }
}
