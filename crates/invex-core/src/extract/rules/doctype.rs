//! Keyword-based document type detection.

use crate::models::document::DocumentType;

/// Indicator phrases per document type, in tie-break order.
const INDICATORS: [(DocumentType, &[&str]); 5] = [
    (
        DocumentType::Invoice,
        &["invoice", "bill to", "remit to", "due date", "invoice number", "subtotal"],
    ),
    (
        DocumentType::Receipt,
        &["receipt", "transaction", "cashier", "change due", "thank you for"],
    ),
    (
        DocumentType::Contract,
        &["agreement", "contract", "parties", "whereas", "terms and conditions"],
    ),
    (
        DocumentType::PurchaseOrder,
        &["purchase order", "po number", "ship to", "vendor", "quantity"],
    ),
    (
        DocumentType::Shipping,
        &["tracking", "shipment", "carrier", "delivery", "package"],
    ),
];

/// Score each type by the number of indicators present; the highest score wins,
/// earlier types win ties, and no hits at all means [`DocumentType::General`].
pub fn detect_document_type(text: &str) -> DocumentType {
    let lower = text.to_lowercase();

    let mut best = (DocumentType::General, 0usize);
    for (doc_type, indicators) in INDICATORS {
        let score = indicators.iter().filter(|i| lower.contains(**i)).count();
        if score > best.1 {
            best = (doc_type, score);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_invoice() {
        let text = "INVOICE # 1\nBILL TO: Someone\nSUBTOTAL 10.00";
        assert_eq!(detect_document_type(text), DocumentType::Invoice);
    }

    #[test]
    fn test_detect_receipt() {
        let text = "Cashier: Sam\nTransaction 8812\nThank you for shopping";
        assert_eq!(detect_document_type(text), DocumentType::Receipt);
    }

    #[test]
    fn test_tie_prefers_earlier_type() {
        // one invoice indicator, one receipt indicator
        assert_eq!(detect_document_type("invoice receipt"), DocumentType::Invoice);
    }

    #[test]
    fn test_no_indicators() {
        assert_eq!(detect_document_type("lorem ipsum"), DocumentType::General);
    }
}
