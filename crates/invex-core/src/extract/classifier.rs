//! Structural classification of item table lines.
//!
//! Lines are classified by shape rather than table position so that ragged
//! OCR line breaks (a quantity row wrapping into a code row and/or a price
//! row) still assemble into one item.

use rust_decimal::Decimal;

use super::rules::numbers::{parse_price, parse_quantity};
use super::rules::patterns::{ITEM_START, PRICE_ONLY_LINE, PRODUCT_CODE_LINE, TRAILING_PRICE_PAIR};

/// Unit price and total read from a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePair {
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Shape of one trimmed physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `5 Widget Assembly [10.00 50.00]` - opens a new item.
    ItemStart { quantity: u32, remainder: &'a str },
    /// `WID-2024-A [10.00 50.00]` - refines the current item.
    ProductCodeContinuation(&'a str),
    /// `10.00 50.00` - prices for the current item.
    PriceOnlyContinuation(PricePair),
    /// Anything else; ignored.
    Unrecognized,
}

/// Classify `line`. Continuation shapes are only recognised while an item is
/// in progress; rules are tried in order and the first match wins.
pub fn classify_line(line: &str, item_in_progress: bool) -> LineClass<'_> {
    if let Some(caps) = ITEM_START.captures(line) {
        let remainder = caps.get(2).map_or("", |m| m.as_str());
        return LineClass::ItemStart {
            quantity: parse_quantity(&caps[1]),
            remainder,
        };
    }

    if !item_in_progress {
        return LineClass::Unrecognized;
    }

    if PRODUCT_CODE_LINE.is_match(line) {
        return LineClass::ProductCodeContinuation(line);
    }

    if let Some(caps) = PRICE_ONLY_LINE.captures(line) {
        return LineClass::PriceOnlyContinuation(PricePair {
            unit_price: parse_price(&caps[1]),
            total: parse_price(&caps[2]),
        });
    }

    LineClass::Unrecognized
}

/// Split a closing `unit_price total` pair off `text`.
///
/// Returns the text before the pair (trimmed) and the pair, or the whole
/// trimmed text and `None`.
pub fn split_trailing_prices(text: &str) -> (&str, Option<PricePair>) {
    match TRAILING_PRICE_PAIR.captures(text) {
        Some(caps) => {
            let start = caps.get(0).map_or(text.len(), |m| m.start());
            let pair = PricePair {
                unit_price: parse_price(&caps[1]),
                total: parse_price(&caps[2]),
            };
            (text[..start].trim(), Some(pair))
        }
        None => (text.trim(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(unit: i64, total: i64) -> PricePair {
        PricePair {
            unit_price: Decimal::new(unit, 2),
            total: Decimal::new(total, 2),
        }
    }

    #[test]
    fn test_item_start() {
        assert_eq!(
            classify_line("5 Widget Assembly", false),
            LineClass::ItemStart {
                quantity: 5,
                remainder: "Widget Assembly"
            }
        );
        assert_eq!(
            classify_line("12    Hex bolts   0.10   1.20", true),
            LineClass::ItemStart {
                quantity: 12,
                remainder: "Hex bolts   0.10   1.20"
            }
        );
    }

    #[test]
    fn test_item_start_beats_continuations() {
        // digits first, so never a price-only line even while building
        assert!(matches!(
            classify_line("10 50.00", true),
            LineClass::ItemStart { quantity: 10, .. }
        ));
    }

    #[test]
    fn test_product_code_only_while_building() {
        assert_eq!(
            classify_line("WID-2024-A 10.00 50.00", true),
            LineClass::ProductCodeContinuation("WID-2024-A 10.00 50.00")
        );
        assert_eq!(classify_line("WID-2024-A 10.00 50.00", false), LineClass::Unrecognized);
        assert_eq!(classify_line("Wid-2024", true), LineClass::Unrecognized);
    }

    #[test]
    fn test_price_only_only_while_building() {
        assert_eq!(
            classify_line("10.00 50.00", true),
            LineClass::PriceOnlyContinuation(pair(1000, 5000))
        );
        assert_eq!(classify_line("10.00 50.00", false), LineClass::Unrecognized);
        assert_eq!(classify_line("10.00 50.00 USD", true), LineClass::Unrecognized);
    }

    #[test]
    fn test_split_trailing_prices() {
        assert_eq!(
            split_trailing_prices("Widget Assembly 10.00 50.00"),
            ("Widget Assembly", Some(pair(1000, 5000)))
        );
        assert_eq!(split_trailing_prices("Widget Assembly "), ("Widget Assembly", None));
    }
}
