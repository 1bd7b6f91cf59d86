//! Line-oriented item assembly over the item table region.
//!
//! Assembly is a fold over classified lines. The accumulator holds the item
//! being built (if any) and the items emitted so far; an item is emitted when
//! the next item starts or input ends, and only if it has a positive total.

use tracing::{debug, trace};

use crate::models::document::LineItem;

use super::classifier::{classify_line, split_trailing_prices, LineClass, PricePair};
use super::rules::patterns::LEADING_CODE;

/// Fold accumulator for sequential assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyState {
    current: Option<LineItem>,
    emitted: Vec<LineItem>,
}

impl AssemblyState {
    /// Whether an item is in progress.
    pub fn is_building(&self) -> bool {
        self.current.is_some()
    }

    /// Item in progress.
    pub fn current(&self) -> Option<&LineItem> {
        self.current.as_ref()
    }

    /// Items emitted so far.
    pub fn emitted(&self) -> &[LineItem] {
        &self.emitted
    }

    /// Apply one classified line.
    pub fn step(mut self, class: LineClass<'_>) -> Self {
        match class {
            LineClass::ItemStart { quantity, remainder } => {
                self.flush();

                let (description, prices) = split_trailing_prices(remainder);
                let mut item = LineItem::new(quantity, description);
                if let Some(pair) = prices {
                    apply_prices(&mut item, pair);
                }
                self.current = Some(item);
            }
            LineClass::ProductCodeContinuation(line) => {
                if let Some(item) = self.current.as_mut() {
                    if let Some(caps) = LEADING_CODE.captures(line) {
                        item.product_code = Some(caps[1].to_string());
                    }
                    if let (_, Some(pair)) = split_trailing_prices(line) {
                        apply_prices(item, pair);
                    }
                }
            }
            LineClass::PriceOnlyContinuation(pair) => {
                if let Some(item) = self.current.as_mut() {
                    apply_prices(item, pair);
                }
            }
            LineClass::Unrecognized => {}
        }
        self
    }

    /// Close the input and return the emitted items.
    pub fn finish(mut self) -> Vec<LineItem> {
        self.flush();
        self.emitted
    }

    fn flush(&mut self) {
        if let Some(item) = self.current.take() {
            if item.is_complete() {
                self.emitted.push(item);
            } else {
                trace!("Discarding incomplete item {:?}", item.description);
            }
        }
    }
}

fn apply_prices(item: &mut LineItem, pair: PricePair) {
    item.unit_price = pair.unit_price;
    item.total = pair.total;
}

/// Primary line-item strategy: sequential assembly over table lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialItemAssembler;

impl SequentialItemAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble items from trimmed, non-empty lines in order.
    pub fn assemble<'a, I>(&self, lines: I) -> Vec<LineItem>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let items = lines
            .into_iter()
            .fold(AssemblyState::default(), |state, line| {
                let class = classify_line(line, state.is_building());
                trace!("{:?} <- {:?}", class, line);
                state.step(class)
            })
            .finish();

        debug!("Sequential assembly produced {} items", items.len());
        items
    }
}
