//! Whole-text regex templates for line items.
//!
//! Runs over the entire document rather than the table region and
//! over-generates on purpose; duplicates are removed by the deduplicator.

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::models::document::LineItem;

use super::rules::numbers::{parse_price, parse_quantity};
use super::rules::patterns::{EMBEDDED_CODE, ITEM_PAREN_CODE, ITEM_SINGLE_LINE, ITEM_WITH_CODE_LINE};

/// Item layouts recognised by [`PatternItemExtractor`], in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTemplate {
    /// `qty description unit total` on one line.
    SingleLine,
    /// `qty description` then `CODE ... unit total` on the next line.
    CodeOnNextLine,
    /// `qty description (CODE) unit total`.
    ParenthesizedCode,
}

impl ItemTemplate {
    pub const ALL: [ItemTemplate; 3] = [
        ItemTemplate::SingleLine,
        ItemTemplate::CodeOnNextLine,
        ItemTemplate::ParenthesizedCode,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            ItemTemplate::SingleLine => &ITEM_SINGLE_LINE,
            ItemTemplate::CodeOnNextLine => &ITEM_WITH_CODE_LINE,
            ItemTemplate::ParenthesizedCode => &ITEM_PAREN_CODE,
        }
    }

    fn to_item(self, caps: &Captures<'_>) -> LineItem {
        let (code, unit, total) = match self {
            ItemTemplate::SingleLine => (None, &caps[3], &caps[4]),
            ItemTemplate::CodeOnNextLine | ItemTemplate::ParenthesizedCode => {
                (Some(&caps[3]), &caps[4], &caps[5])
            }
        };

        let mut item = LineItem::new(parse_quantity(&caps[1]), caps[2].trim())
            .with_prices(parse_price(unit), parse_price(total));
        item.product_code = code.map(str::to_string);
        item
    }

    /// All candidates for this template, in text order.
    pub fn candidates(&self, text: &str) -> Vec<LineItem> {
        self.located(text).map(|(_, item)| item).collect()
    }

    /// Candidates paired with the byte offset where their match starts.
    fn located<'t>(&self, text: &'t str) -> impl Iterator<Item = (usize, LineItem)> + 't {
        let template = *self;
        template.regex().captures_iter(text).map(move |caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            (start, template.to_item(&caps))
        })
    }
}

/// Fallback line-item strategy over the whole document text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternItemExtractor;

impl PatternItemExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Candidates from every template, in source order.
    ///
    /// Candidates starting at the same offset keep template priority order.
    /// Items without a structural product code get one lifted from their
    /// description when present. Candidates without a positive total are
    /// dropped.
    pub fn extract(&self, text: &str) -> Vec<LineItem> {
        let mut located = Vec::new();

        for (rank, template) in ItemTemplate::ALL.into_iter().enumerate() {
            let before = located.len();
            located.extend(template.located(text).map(|(start, item)| (start, rank, item)));
            trace!("{:?} matched {} candidates", template, located.len() - before);
        }

        located.sort_by_key(|(start, rank, _)| (*start, *rank));

        let items: Vec<LineItem> = located
            .into_iter()
            .map(|(_, _, item)| lift_embedded_code(item))
            .filter(LineItem::is_complete)
            .collect();

        debug!("Pattern extraction produced {} candidates", items.len());
        items
    }
}

/// Move an embedded product code out of the description.
fn lift_embedded_code(mut item: LineItem) -> LineItem {
    if item.product_code.is_some() {
        return item;
    }

    let Some(code) = EMBEDDED_CODE.find(&item.description).map(|m| m.as_str().to_string()) else {
        return item;
    };

    let stripped = item.description.replacen(&code, "", 1).replace("()", "");
    item.description = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    item.product_code = Some(code);
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_single_line_template() {
        let items = ItemTemplate::SingleLine.candidates("  5  Widget Assembly  10.00  50.00\n");
        assert_eq!(
            items,
            vec![LineItem::new(5, "Widget Assembly").with_prices(dec("10.00"), dec("50.00"))]
        );
    }

    #[test]
    fn test_code_on_next_line_template() {
        let text = "5 Widget Assembly\nWID-2024-A 10.00 50.00\n";
        let items = ItemTemplate::CodeOnNextLine.candidates(text);
        assert_eq!(
            items,
            vec![LineItem::new(5, "Widget Assembly")
                .with_product_code("WID-2024-A")
                .with_prices(dec("10.00"), dec("50.00"))]
        );
    }

    #[test]
    fn test_parenthesized_code_template() {
        let items = ItemTemplate::ParenthesizedCode.candidates("2 Gear box (GBX-9) 30.00 60.00");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Gear box");
        assert_eq!(items[0].product_code.as_deref(), Some("GBX-9"));
    }

    #[test]
    fn test_embedded_code_lifted() {
        let items = PatternItemExtractor::new().extract("1 Cable HDMI2M-BLK 2m 7.50 7.50");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Cable 2m");
        assert_eq!(items[0].product_code.as_deref(), Some("HDMI2M-BLK"));
    }

    #[test]
    fn test_parenthesized_line_overgenerates_identical_items() {
        // single-line and parenthesized templates both match; the lifted
        // code leaves the same description so the deduplicator can merge them
        let items = PatternItemExtractor::new().extract("2 Gear box (GBX-9) 30.00 60.00");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }

    #[test]
    fn test_candidates_follow_source_order() {
        let text = "5 Widget Assembly\nWID-2024-A 10.00 50.00\n1 Bolt 1.00 1.00\n2 Gear box (GBX-9) 30.00 60.00\n";
        let items = PatternItemExtractor::new().extract(text);

        let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Widget Assembly", "Bolt", "Gear box", "Gear box"]);
        assert_eq!(items[0].product_code.as_deref(), Some("WID-2024-A"));
    }

    #[test]
    fn test_zero_total_candidates_dropped() {
        assert!(PatternItemExtractor::new().extract("1 Sample 0.00 0.00").is_empty());
    }

    #[test]
    fn test_no_candidates() {
        assert!(PatternItemExtractor::new().extract("Thank you for your business").is_empty());
    }
}
