//! Document data model: line items, header fields, totals and the combined
//! extraction result.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a document's item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Quantity taken from the leading integer of the item-start line.
    pub quantity: u32,

    /// Free-text description with trailing price tokens removed.
    pub description: String,

    /// Product code (uppercase alphanumeric, 3+ leading letters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,

    /// Unit price; zero until discovered.
    pub unit_price: Decimal,

    /// Line total; zero until discovered.
    pub total: Decimal,
}

impl LineItem {
    /// Create an item with no prices yet.
    pub fn new(quantity: u32, description: impl Into<String>) -> Self {
        Self {
            quantity,
            description: description.into(),
            product_code: None,
            unit_price: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Set unit price and total.
    pub fn with_prices(mut self, unit_price: Decimal, total: Decimal) -> Self {
        self.unit_price = unit_price;
        self.total = total;
        self
    }

    /// Set the product code.
    pub fn with_product_code(mut self, code: impl Into<String>) -> Self {
        self.product_code = Some(code.into());
        self
    }

    /// An item is complete once it carries a positive total.
    pub fn is_complete(&self) -> bool {
        self.total > Decimal::ZERO
    }
}

/// An extracted field value.
///
/// Layout-specific extractors yield bare values; generic labelled lookups
/// also carry a confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Bare value.
    Scalar(String),
    /// Value with a confidence score (0.0 - 1.0).
    Confident { value: String, confidence: f32 },
}

impl FieldValue {
    /// The textual value regardless of shape.
    pub fn value(&self) -> &str {
        match self {
            FieldValue::Scalar(value) => value,
            FieldValue::Confident { value, .. } => value,
        }
    }

    /// Confidence, if the value carries one.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            FieldValue::Scalar(_) => None,
            FieldValue::Confident { confidence, .. } => Some(*confidence),
        }
    }

    /// Replace the value while keeping the shape (and confidence).
    pub fn map_value(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            FieldValue::Scalar(value) => FieldValue::Scalar(f(value)),
            FieldValue::Confident { value, confidence } => FieldValue::Confident {
                value: f(value),
                confidence,
            },
        }
    }
}

/// Header metadata keyed by field name (`invoice_number`, `po_number`, ...).
///
/// Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderFields(BTreeMap<String, FieldValue>);

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    /// Textual value of a field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(FieldValue::value)
    }

    /// Field with its shape.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rewrite every value in place, keeping each field's shape.
    pub fn map_values(self, mut f: impl FnMut(&str, String) -> String) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|(name, value)| {
                    let value = value.map_value(|v| f(&name, v));
                    (name, value)
                })
                .collect(),
        )
    }
}

/// Kind of financial total stated on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalKind {
    Subtotal,
    Tax,
    Shipping,
    Total,
}

impl TotalKind {
    pub const ALL: [TotalKind; 4] = [
        TotalKind::Subtotal,
        TotalKind::Tax,
        TotalKind::Shipping,
        TotalKind::Total,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TotalKind::Subtotal => "Subtotal",
            TotalKind::Tax => "Tax",
            TotalKind::Shipping => "Shipping",
            TotalKind::Total => "Total",
        }
    }
}

/// Stated totals keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Totals(BTreeMap<TotalKind, Decimal>);

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: TotalKind, amount: Decimal) {
        self.0.insert(kind, amount);
    }

    pub fn get(&self, kind: TotalKind) -> Option<Decimal> {
        self.0.get(&kind).copied()
    }

    pub fn subtotal(&self) -> Option<Decimal> {
        self.get(TotalKind::Subtotal)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TotalKind, Decimal)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Contact details found anywhere in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phones: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.urls.is_empty()
    }
}

/// Broad document category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    Receipt,
    Contract,
    PurchaseOrder,
    Shipping,
    #[default]
    General,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Receipt => "receipt",
            DocumentType::Contract => "contract",
            DocumentType::PurchaseOrder => "purchase_order",
            DocumentType::Shipping => "shipping",
            DocumentType::General => "general",
        }
    }
}

/// Which line-item strategy produced the final item list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Line-oriented assembly over the table region.
    #[default]
    Sequential,
    /// Whole-text regex templates.
    Pattern,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Pattern => "pattern",
        }
    }
}

/// Comparison of summed line-item totals against the stated subtotal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Sum of all line-item totals.
    pub line_items_total: Decimal,

    /// Subtotal printed on the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stated_subtotal: Option<Decimal>,

    /// Absolute difference, when a subtotal was stated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<Decimal>,

    /// Set when the difference exceeds the tolerance.
    pub mismatch: bool,

    /// Set when the item totals do not fit in a `Decimal`; the total is
    /// then saturated at `Decimal::MAX`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub overflow: bool,
}

impl Reconciliation {
    /// Reconcile `items` against `subtotal`.
    pub fn compute(items: &[LineItem], subtotal: Option<Decimal>, tolerance: Decimal) -> Self {
        let sum = checked_total(items);
        let overflow = sum.is_none();
        let line_items_total = sum.unwrap_or(Decimal::MAX);
        let difference = subtotal.map(|s| {
            line_items_total
                .checked_sub(s)
                .map(|d| d.abs())
                .unwrap_or(Decimal::MAX)
        });

        Self {
            line_items_total,
            stated_subtotal: subtotal,
            difference,
            mismatch: overflow || difference.is_some_and(|d| d > tolerance),
            overflow,
        }
    }
}

/// Sum of item totals, `None` on overflow.
pub fn checked_total(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Identifier of the source document (usually the file name).
    pub source_id: String,

    /// Detected document category.
    pub document_type: DocumentType,

    /// Header metadata.
    pub header: HeaderFields,

    /// Ordered line items; every item has a positive total.
    pub line_items: Vec<LineItem>,

    /// Stated financial totals.
    pub totals: Totals,

    /// Contact details.
    #[serde(default, skip_serializing_if = "Contacts::is_empty")]
    pub contacts: Contacts,

    /// Line items vs. subtotal check.
    pub reconciliation: Reconciliation,

    /// Strategy that produced `line_items`.
    pub strategy: StrategyKind,

    /// Heuristic misses worth a human look.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Text the extraction ran over.
    pub raw_text: String,
}

impl ExtractionResult {
    /// Sum of line-item totals, saturating at `Decimal::MAX`.
    pub fn line_items_total(&self) -> Decimal {
        checked_total(&self.line_items).unwrap_or(Decimal::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_line_item_completeness() {
        let item = LineItem::new(2, "Bolt");
        assert!(!item.is_complete());
        assert!(item.with_prices(dec("1.50"), dec("3.00")).is_complete());
    }

    #[test]
    fn test_field_value_accessors() {
        let scalar = FieldValue::Scalar("INV-1".to_string());
        let confident = FieldValue::Confident {
            value: "Net 30".to_string(),
            confidence: 0.9,
        };

        assert_eq!(scalar.value(), "INV-1");
        assert_eq!(scalar.confidence(), None);
        assert_eq!(confident.value(), "Net 30");
        assert_eq!(confident.confidence(), Some(0.9));
    }

    #[test]
    fn test_field_value_serde_shapes() {
        let scalar = FieldValue::Scalar("A-1".to_string());
        assert_eq!(serde_json::to_string(&scalar).unwrap(), "\"A-1\"");

        let parsed: FieldValue =
            serde_json::from_str(r#"{"value":"Net 30","confidence":0.9}"#).unwrap();
        assert_eq!(parsed.value(), "Net 30");
        assert!(parsed.confidence().is_some());
    }

    #[test]
    fn test_map_value_keeps_shape() {
        let field = FieldValue::Confident {
            value: " x ".to_string(),
            confidence: 0.5,
        };
        let mapped = field.map_value(|v| v.trim().to_string());
        assert_eq!(
            mapped,
            FieldValue::Confident {
                value: "x".to_string(),
                confidence: 0.5
            }
        );
    }

    #[test]
    fn test_totals_serialize_as_map() {
        let mut totals = Totals::new();
        totals.insert(TotalKind::Subtotal, dec("300.00"));
        totals.insert(TotalKind::Tax, dec("24.00"));

        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["subtotal"], "300.00");
        assert_eq!(json["tax"], "24.00");
    }

    #[test]
    fn test_reconciliation() {
        let items = vec![
            LineItem::new(1, "A").with_prices(dec("100.00"), dec("100.00")),
            LineItem::new(2, "B").with_prices(dec("100.00"), dec("200.00")),
        ];

        let ok = Reconciliation::compute(&items, Some(dec("300.00")), dec("0.01"));
        assert_eq!(ok.line_items_total, dec("300.00"));
        assert!(!ok.mismatch);

        let off = Reconciliation::compute(&items, Some(dec("310.00")), dec("0.01"));
        assert_eq!(off.difference, Some(dec("10.00")));
        assert!(off.mismatch);

        let unstated = Reconciliation::compute(&items, None, dec("0.01"));
        assert_eq!(unstated.difference, None);
        assert!(!unstated.mismatch);
    }

    #[test]
    fn test_reconciliation_saturates_on_overflow() {
        let huge = Decimal::MAX;
        let items = vec![
            LineItem::new(1, "A").with_prices(huge, huge),
            LineItem::new(1, "B").with_prices(huge, huge),
        ];

        let rec = Reconciliation::compute(&items, Some(dec("1.00")), dec("0.01"));
        assert!(rec.overflow);
        assert!(rec.mismatch);
        assert_eq!(rec.line_items_total, Decimal::MAX);
        assert_eq!(rec.difference, Some(Decimal::MAX - dec("1.00")));

        let unstated = Reconciliation::compute(&items, None, dec("0.01"));
        assert!(unstated.overflow);
        assert!(unstated.mismatch);
        assert_eq!(checked_total(&items), None);
    }
}
