//! Rule-based field extractors.

pub mod contacts;
pub mod doctype;
pub mod header;
pub mod numbers;
pub mod patterns;
pub mod totals;

pub use contacts::{extract_contacts, EmailExtractor, PhoneExtractor, UrlExtractor};
pub use doctype::detect_document_type;
pub use header::{extract_header_fields, HeaderFieldExtractor};
pub use numbers::{parse_amount, parse_price, parse_quantity};
pub use totals::{extract_totals, TotalsExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
