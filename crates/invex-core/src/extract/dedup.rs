//! Stable deduplication of candidate items.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::document::LineItem;

/// Keeps the first item per `(description, total)` key, in encounter order.
#[derive(Debug, Clone, Default)]
pub struct ItemDeduplicator {
    seen: HashSet<(String, Decimal)>,
}

impl ItemDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(item: &LineItem) -> (String, Decimal) {
        (item.description.clone(), item.total.normalize())
    }

    /// Whether `item` is new; records its key.
    pub fn admit(&mut self, item: &LineItem) -> bool {
        let fresh = self.seen.insert(Self::key(item));
        if !fresh {
            trace!("Dropping duplicate item {:?} {}", item.description, item.total);
        }
        fresh
    }

    /// Deduplicate `items`.
    pub fn dedup(&mut self, items: Vec<LineItem>) -> Vec<LineItem> {
        items.into_iter().filter(|item| self.admit(item)).collect()
    }
}

/// Deduplicate `items` with a fresh key set.
pub fn dedup_items(items: Vec<LineItem>) -> Vec<LineItem> {
    ItemDeduplicator::new().dedup(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(desc: &str, code: Option<&str>, total: Decimal) -> LineItem {
        let mut item = LineItem::new(1, desc).with_prices(total, total);
        item.product_code = code.map(str::to_string);
        item
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let items = vec![
            item("Bolt", Some("BLT-1"), Decimal::new(100, 2)),
            item("Nut", None, Decimal::new(50, 2)),
            item("Bolt", None, Decimal::new(100, 2)),
        ];

        let deduped = dedup_items(items);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].product_code.as_deref(), Some("BLT-1"));
        assert_eq!(deduped[1].description, "Nut");
    }

    #[test]
    fn test_numeric_key_ignores_scale() {
        let items = vec![
            item("Bolt", None, Decimal::new(1, 0)),
            item("Bolt", None, Decimal::new(100, 2)),
        ];
        assert_eq!(dedup_items(items).len(), 1);
    }

    #[test]
    fn test_same_description_different_total_kept() {
        let items = vec![
            item("Bolt", None, Decimal::new(100, 2)),
            item("Bolt", None, Decimal::new(200, 2)),
        ];
        assert_eq!(dedup_items(items).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let items = vec![
            item("A", None, Decimal::ONE),
            item("A", None, Decimal::ONE),
            item("B", None, Decimal::TWO),
        ];
        let once = dedup_items(items);
        let twice = dedup_items(once.clone());
        assert_eq!(once, twice);
    }
}
