//! Lenient numeric token parsing.
//!
//! Malformed tokens become zero instead of failing the extraction.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

/// Parse a base-10 quantity; malformed or overflowing tokens yield 0.
pub fn parse_quantity(token: &str) -> u32 {
    token.trim().parse().unwrap_or_else(|_| {
        trace!("Malformed quantity token {:?}, using 0", token);
        0
    })
}

/// Parse a price token such as `10.00`, `10.` or `10`; malformed tokens yield 0.
pub fn parse_price(token: &str) -> Decimal {
    let cleaned = token.trim().trim_end_matches('.');
    Decimal::from_str(cleaned).unwrap_or_else(|_| {
        trace!("Malformed price token {:?}, using 0", token);
        Decimal::ZERO
    })
}

/// Parse a stated amount with thousands separators (`1,234.56`).
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(cleaned.trim_end_matches('.')).ok()
}
