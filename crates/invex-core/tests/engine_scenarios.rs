//! End-to-end behaviour of the line-item engine and document parser.

use std::str::FromStr;

use invex_core::extract::rules::{extract_header_fields, extract_totals};
use invex_core::extract::{dedup_items, PatternItemExtractor, PatternStrategy, ItemExtractionStrategy};
use invex_core::{
    extract_line_items, DocumentExtractor, DocumentParser, LineItem, LineItemExtractionEngine,
    StrategyKind, TotalKind,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn descriptions(items: &[LineItem]) -> Vec<&str> {
    items.iter().map(|i| i.description.as_str()).collect()
}

fn assert_all_complete(items: &[LineItem]) {
    assert!(items.iter().all(|i| i.total > Decimal::ZERO), "{items:?}");
}

const THREE_ITEMS: &str = "\
INVOICE # 5521
DATE: 02/01/2024

QUANTITY    DESCRIPTION        UNIT PRICE    TOTAL
2           Steel bracket      50.00         100.00
4           Mounting plate     25.00         100.00
1           Control panel      100.00        100.00
SUBTOTAL 300.00
SALES TAX 24.00
TOTAL DUE 324.00
";

#[test]
fn three_same_line_items_reconcile() {
    let items = extract_line_items(THREE_ITEMS);
    assert_eq!(items.len(), 3);
    assert_all_complete(&items);

    let sum: Decimal = items.iter().map(|i| i.total).sum();
    assert_eq!(sum, dec("300.00"));

    let result = DocumentParser::new().extract_document(THREE_ITEMS, "a.txt").unwrap();
    assert_eq!(result.strategy, StrategyKind::Sequential);
    assert_eq!(result.reconciliation.stated_subtotal, Some(dec("300.00")));
    assert!(!result.reconciliation.mismatch);
}

#[test]
fn code_line_refines_item() {
    let text = "\
QUANTITY DESCRIPTION UNIT PRICE TOTAL
5 Widget Assembly
WID-2024-A 10.00 50.00
SUBTOTAL 50.00
";
    let items = extract_line_items(text);
    assert_eq!(
        items,
        vec![LineItem::new(5, "Widget Assembly")
            .with_product_code("WID-2024-A")
            .with_prices(dec("10.00"), dec("50.00"))]
    );
}

#[test]
fn item_without_prices_is_dropped() {
    let text = "\
QUANTITY DESCRIPTION UNIT PRICE TOTAL
1 Hinge 3.00 3.00
6 Door stop
2 Latch 4.50 9.00
SUBTOTAL 12.00
";
    let items = extract_line_items(text);
    assert_eq!(descriptions(&items), vec!["Hinge", "Latch"]);
}

const SPLIT_TABLE: &str = "\
QUANTITY DESCRIPTION UNIT PRICE TOTAL
1 Alpha 1.00 1.00
2 Bravo 2.00 4.00
3 Charlie 3.00 9.00
SUBTOTAL 14.00
Continued
4 Delta 4.00 16.00
5 Echo 5.00 25.00
6 Foxtrot 6.00 36.00
7 Golf 7.00 49.00
";

#[test]
fn larger_pattern_result_replaces_sequential() {
    let (strategy, items) = LineItemExtractionEngine::new().extract_with_strategy(SPLIT_TABLE);
    assert_eq!(strategy, StrategyKind::Pattern);
    assert_eq!(
        descriptions(&items),
        vec!["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf"]
    );
}

#[test]
fn no_markers_uses_pattern_output() {
    let text = "\
Thanks for the order, here is what shipped:
3 Copper pipe 12.00 36.00
and separately
1 Valve kit (VLV-10) 18.50 18.50
Call us with questions.
";
    let items = extract_line_items(text);
    let expected = PatternStrategy::default().extract(text);

    assert_eq!(items, expected);
    assert_eq!(descriptions(&items), vec!["Copper pipe", "Valve kit"]);
    assert_eq!(items[1].product_code.as_deref(), Some("VLV-10"));
}

#[test]
fn pattern_output_keeps_document_order() {
    let text = "5 Widget Assembly\nWID-2024-A 10.00 50.00\n1 Bolt 1.00 1.00\n";
    let items = extract_line_items(text);
    assert_eq!(descriptions(&items), vec!["Widget Assembly", "Bolt"]);
}

#[test]
fn duplicate_shipping_fee_collapses() {
    let text = "1 Shipping Fee 25.00 25.00\nNotes\n1 Shipping Fee 25.00 25.00\n";
    let candidates = PatternItemExtractor::new().extract(text);
    assert_eq!(candidates.len(), 2);

    let items = dedup_items(candidates);
    assert_eq!(items.len(), 1);
    assert_eq!(extract_line_items(text), items);
}

#[test]
fn quantity_ignores_whitespace_variations() {
    let text = "\
QUANTITY DESCRIPTION UNIT PRICE TOTAL
7\t  Bolt 1.00 7.00
   12     Nut 0.50 6.00
SUBTOTAL 13.00
";
    let quantities: Vec<u32> = extract_line_items(text).iter().map(|i| i.quantity).collect();
    assert_eq!(quantities, vec![7, 12]);
}

#[test]
fn every_result_is_complete() {
    for text in [THREE_ITEMS, SPLIT_TABLE, "1 Free sample 0.00 0.00\n"] {
        assert_all_complete(&extract_line_items(text));
    }
}

#[test]
fn extraction_is_idempotent() {
    let engine = LineItemExtractionEngine::new();
    assert_eq!(engine.extract(SPLIT_TABLE), engine.extract(SPLIT_TABLE));
    assert_eq!(engine.extract(THREE_ITEMS), engine.extract(THREE_ITEMS));
}

#[test]
fn threshold_is_configurable() {
    // with a threshold of 3 the three sequential items are trusted
    let engine = LineItemExtractionEngine::new().with_min_sequential_items(3);
    let (strategy, items) = engine.extract_with_strategy(SPLIT_TABLE);
    assert_eq!(strategy, StrategyKind::Sequential);
    assert_eq!(items.len(), 3);
}

#[test]
fn header_and_totals_are_independent() {
    let header = extract_header_fields(THREE_ITEMS);
    assert_eq!(header.get("invoice_number"), Some("5521"));
    assert_eq!(header.get("date"), Some("02/01/2024"));

    let totals = extract_totals(THREE_ITEMS);
    assert_eq!(totals.get(TotalKind::Subtotal), Some(dec("300.00")));
    assert_eq!(totals.get(TotalKind::Tax), Some(dec("24.00")));
    assert_eq!(totals.get(TotalKind::Total), Some(dec("324.00")));
    assert_eq!(totals.get(TotalKind::Shipping), None);
}

#[test]
fn result_serializes_to_json() {
    let result = DocumentParser::new().extract_document(THREE_ITEMS, "a.txt").unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["source_id"], "a.txt");
    assert_eq!(json["strategy"], "sequential");
    assert_eq!(json["line_items"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["totals"]["subtotal"], "300.00");
}
