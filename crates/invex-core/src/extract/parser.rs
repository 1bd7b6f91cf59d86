//! Whole-document extraction: header, line items, totals and reconciliation.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::document::{Contacts, DocumentType, ExtractionResult, Reconciliation};

use super::engine::LineItemExtractionEngine;
use super::normalizer::{normalize_line_endings, TableRegion};
use super::rules::{detect_document_type, extract_contacts, HeaderFieldExtractor, TotalsExtractor};
use super::Result;

/// Trait for document parsing.
pub trait DocumentExtractor {
    /// Extract a structured record from document text.
    fn extract_document(
        &self,
        text: &str,
        source_id: &str,
    ) -> Result<ExtractionResult>;
}

/// Rule-based document parser.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    engine: LineItemExtractionEngine,
    header: HeaderFieldExtractor,
    totals: TotalsExtractor,
    tolerance: Decimal,
    detect_document_type: bool,
    extract_contacts: bool,
}

impl DocumentParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            engine: LineItemExtractionEngine::new()
                .with_min_sequential_items(config.min_sequential_items),
            header: HeaderFieldExtractor::new(),
            totals: TotalsExtractor::new(),
            tolerance: config.reconciliation_tolerance,
            detect_document_type: config.detect_document_type,
            extract_contacts: config.extract_contacts,
        }
    }

    /// Replace the line-item engine.
    pub fn with_engine(mut self, engine: LineItemExtractionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the reconciliation tolerance.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for DocumentParser {
    fn extract_document(
        &self,
        text: &str,
        source_id: &str,
    ) -> Result<ExtractionResult> {
        if text.trim().is_empty() {
            return Err(ExtractionError::SourceUnavailable {
                source_id: source_id.to_string(),
            });
        }

        let start = Instant::now();
        let mut warnings = Vec::new();
        let text = normalize_line_endings(text);

        info!("Extracting {} from {} characters of text", source_id, text.len());

        let header = self.header.extract(&text);
        if !header.contains("invoice_number") {
            warnings.push("Could not extract invoice number".to_string());
        }

        if TableRegion::locate(&text).is_none() {
            warnings.push("No item table region found".to_string());
        }

        let (strategy, line_items) = self.engine.extract_with_strategy(&text);
        if line_items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        let totals = self.totals.extract(&text);
        let reconciliation = Reconciliation::compute(&line_items, totals.subtotal(), self.tolerance);
        if reconciliation.overflow {
            warn!("{}: line item totals overflow", source_id);
            warnings.push("Line item totals overflow; sum saturated".to_string());
        } else if reconciliation.mismatch {
            warn!(
                "{}: line items sum to {} but subtotal is {}",
                source_id,
                reconciliation.line_items_total,
                totals.subtotal().unwrap_or_default()
            );
            warnings.push(format!(
                "Line items total {} differs from stated subtotal {}",
                reconciliation.line_items_total,
                totals.subtotal().unwrap_or_default()
            ));
        }

        let document_type = if self.detect_document_type {
            detect_document_type(&text)
        } else {
            DocumentType::General
        };

        let contacts = if self.extract_contacts {
            extract_contacts(&text)
        } else {
            Contacts::default()
        };

        debug!(
            "{}: {} header fields, {} items via {:?}, {} totals",
            source_id,
            header.len(),
            line_items.len(),
            strategy,
            totals.iter().count()
        );

        Ok(ExtractionResult {
            source_id: source_id.to_string(),
            document_type,
            header,
            line_items,
            totals,
            contacts,
            reconciliation,
            strategy,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
            raw_text: text.into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{StrategyKind, TotalKind};
    use std::str::FromStr;

    const INVOICE: &str = "\
ACME SUPPLY CO.
INVOICE # 10045
DATE: 03/14/2024
P.O. NUMBER 7781
SALESPERSON
Dana Lee
Questions: billing@acme.example

QUANTITY   DESCRIPTION   UNIT PRICE   TOTAL
5 Widget Assembly
WID-2024-A 10.00 50.00
2 Gear box (GBX-9) 30.00 60.00
SUBTOTAL 110.00
SALES TAX 8.80
TOTAL DUE 118.80
";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_document() {
        let result = DocumentParser::new().extract_document(INVOICE, "inv.txt").unwrap();

        assert_eq!(result.source_id, "inv.txt");
        assert_eq!(result.document_type, DocumentType::Invoice);
        assert_eq!(result.header.get("invoice_number"), Some("10045"));
        assert_eq!(result.header.get("salesperson"), Some("Dana Lee"));
        assert_eq!(result.strategy, StrategyKind::Sequential);
        assert_eq!(result.line_items.len(), 2);
        assert_eq!(result.totals.get(TotalKind::Total), Some(dec("118.80")));
        assert_eq!(result.contacts.emails, vec!["billing@acme.example"]);
        assert!(!result.reconciliation.mismatch);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_mismatch_warns() {
        let text = INVOICE.replace("SUBTOTAL 110.00", "SUBTOTAL 120.00");
        let result = DocumentParser::new().extract_document(&text, "inv.txt").unwrap();

        assert!(result.reconciliation.mismatch);
        assert_eq!(result.reconciliation.difference, Some(dec("10.00")));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_oversized_totals_do_not_panic() {
        let text = "\
QUANTITY DESCRIPTION UNIT PRICE TOTAL
1 Bulk order 79228162514264337593543950335 79228162514264337593543950335
1 Second order 79228162514264337593543950335 79228162514264337593543950335
SUBTOTAL 1.00
";
        let result = DocumentParser::new().extract_document(text, "big.txt").unwrap();

        assert_eq!(result.line_items.len(), 2);
        assert!(result.reconciliation.overflow);
        assert!(result.reconciliation.mismatch);
        assert_eq!(result.line_items_total(), Decimal::MAX);
        assert!(result.warnings.iter().any(|w| w.contains("overflow")));
    }

    #[test]
    fn test_with_tolerance_and_engine() {
        let text = INVOICE.replace("SUBTOTAL 110.00", "SUBTOTAL 110.50");

        let strict = DocumentParser::new().extract_document(&text, "inv.txt").unwrap();
        assert!(strict.reconciliation.mismatch);

        let lenient = DocumentParser::new()
            .with_tolerance(dec("1.00"))
            .extract_document(&text, "inv.txt")
            .unwrap();
        assert!(!lenient.reconciliation.mismatch);
        assert_eq!(lenient.reconciliation.difference, Some(dec("0.50")));

        // both strategies find two items here; the tie keeps the table result
        let custom = DocumentParser::new()
            .with_engine(LineItemExtractionEngine::new().with_min_sequential_items(3))
            .extract_document(&text, "inv.txt")
            .unwrap();
        assert_eq!(custom.strategy, StrategyKind::Sequential);
        assert_eq!(custom.line_items.len(), 2);
    }

    #[test]
    fn test_blank_text_is_source_unavailable() {
        let err = DocumentParser::new().extract_document(" \n\t", "scan.png").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::SourceUnavailable {
                source_id: "scan.png".to_string()
            }
        );
    }

    #[test]
    fn test_sparse_text_reports_misses() {
        let result = DocumentParser::new()
            .extract_document("Thank you for your business", "note.txt")
            .unwrap();

        assert!(result.line_items.is_empty());
        assert!(result.totals.is_empty());
        assert_eq!(result.reconciliation.stated_subtotal, None);
        assert!(!result.reconciliation.mismatch);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_optional_stages_disabled() {
        let config = ExtractionConfig {
            detect_document_type: false,
            extract_contacts: false,
            ..ExtractionConfig::default()
        };
        let result = DocumentParser::from_config(&config)
            .extract_document(INVOICE, "inv.txt")
            .unwrap();

        assert_eq!(result.document_type, DocumentType::General);
        assert!(result.contacts.is_empty());
    }
}
