//! Financial totals extraction.

use regex::Regex;
use rust_decimal::Decimal;

use crate::models::document::{TotalKind, Totals};

use super::numbers::parse_amount;
use super::patterns::{SALES_TAX, SHIPPING_HANDLING, SUBTOTAL, TOTAL_DUE};

/// Totals extractor; one labelled pattern per kind, first match wins.
#[derive(Debug, Clone, Default)]
pub struct TotalsExtractor;

impl TotalsExtractor {
    pub fn new() -> Self {
        Self
    }

    fn pattern(kind: TotalKind) -> &'static Regex {
        match kind {
            TotalKind::Subtotal => &SUBTOTAL,
            TotalKind::Tax => &SALES_TAX,
            TotalKind::Shipping => &SHIPPING_HANDLING,
            TotalKind::Total => &TOTAL_DUE,
        }
    }

    /// Amount stated for one kind of total.
    pub fn extract_kind(&self, kind: TotalKind, text: &str) -> Option<Decimal> {
        let caps = Self::pattern(kind).captures(text)?;
        parse_amount(&caps[1])
    }

    pub fn extract(&self, text: &str) -> Totals {
        let mut totals = Totals::new();
        for kind in TotalKind::ALL {
            if let Some(amount) = self.extract_kind(kind, text) {
                totals.insert(kind, amount);
            }
        }
        totals
    }
}

/// Extract stated totals from document text.
pub fn extract_totals(text: &str) -> Totals {
    TotalsExtractor::new().extract(text)
}
