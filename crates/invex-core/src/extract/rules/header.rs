//! Header field extraction.

use regex::Regex;

use crate::models::document::{FieldValue, HeaderFields};

use super::patterns::{
    ACCOUNT_NUMBER, DOCUMENT_DATE, DUE_DATE, INVOICE_NUMBER, PAYMENT_TERMS, PO_NUMBER,
    SALESPERSON, TAX_ID,
};

/// Confidence attached to generic labelled fields.
const GENERIC_FIELD_CONFIDENCE: f32 = 0.9;

/// Single-pass header field extractor; one pattern per field, first match wins.
#[derive(Debug, Clone)]
pub struct HeaderFieldExtractor {
    include_generic: bool,
}

impl HeaderFieldExtractor {
    pub fn new() -> Self {
        Self {
            include_generic: true,
        }
    }

    /// Toggle the generic labelled fields (`due_date`, `terms`, `tax_id`,
    /// `account_number`).
    pub fn with_generic_fields(mut self, include: bool) -> Self {
        self.include_generic = include;
        self
    }

    pub fn extract(&self, text: &str) -> HeaderFields {
        let mut fields = HeaderFields::new();

        let layout_fields: [(&str, &Regex); 4] = [
            ("invoice_number", &*INVOICE_NUMBER),
            ("po_number", &*PO_NUMBER),
            ("date", &*DOCUMENT_DATE),
            ("salesperson", &*SALESPERSON),
        ];

        for (name, pattern) in layout_fields {
            if let Some(value) = first_capture(pattern, text) {
                fields.insert(name, FieldValue::Scalar(value));
            }
        }

        if self.include_generic {
            let generic_fields: [(&str, &Regex); 4] = [
                ("due_date", &*DUE_DATE),
                ("terms", &*PAYMENT_TERMS),
                ("tax_id", &*TAX_ID),
                ("account_number", &*ACCOUNT_NUMBER),
            ];

            for (name, pattern) in generic_fields {
                if let Some(value) = first_capture(pattern, text) {
                    fields.insert(
                        name,
                        FieldValue::Confident {
                            value,
                            confidence: GENERIC_FIELD_CONFIDENCE,
                        },
                    );
                }
            }
        }

        fields
    }
}

impl Default for HeaderFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    let caps = pattern.captures(text)?;
    let value = caps[1].trim().trim_end_matches([',', '.']).trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Extract header fields from document text.
pub fn extract_header_fields(text: &str) -> HeaderFields {
    HeaderFieldExtractor::new().extract(text)
}
