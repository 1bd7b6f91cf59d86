//! Line-item strategy selection.

use tracing::{debug, info};

use crate::models::document::{LineItem, StrategyKind};

use super::assembler::SequentialItemAssembler;
use super::dedup::dedup_items;
use super::normalizer::{normalize_line_endings, TableRegion};
use super::pattern::PatternItemExtractor;

/// Default item count below which the sequential result is considered weak.
pub const DEFAULT_MIN_SEQUENTIAL_ITEMS: usize = 5;

/// A way of turning document text into line items.
pub trait ItemExtractionStrategy {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Extract items; never fails, misses yield fewer items.
    fn extract(&self, text: &str) -> Vec<LineItem>;
}

/// Table region isolation followed by sequential assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy {
    assembler: SequentialItemAssembler,
}

impl ItemExtractionStrategy for SequentialStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        match TableRegion::locate(text) {
            Some(region) => self.assembler.assemble(region.lines()),
            None => Vec::new(),
        }
    }
}

/// Whole-text templates followed by deduplication of their own output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStrategy {
    extractor: PatternItemExtractor,
}

impl ItemExtractionStrategy for PatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    fn extract(&self, text: &str) -> Vec<LineItem> {
        dedup_items(self.extractor.extract(text))
    }
}

/// Keep the fallback result only when it has strictly more items.
pub fn select_items(
    primary: Vec<LineItem>,
    fallback: Vec<LineItem>,
) -> (StrategyKind, Vec<LineItem>) {
    if fallback.len() > primary.len() {
        (StrategyKind::Pattern, fallback)
    } else {
        (StrategyKind::Sequential, primary)
    }
}

/// Runs the sequential strategy and, when it yields too few items, the
/// pattern strategy; whichever found more items wins outright. Without an
/// item table region the pattern strategy runs alone.
#[derive(Debug, Clone)]
pub struct LineItemExtractionEngine {
    sequential: SequentialStrategy,
    pattern: PatternStrategy,
    min_sequential_items: usize,
}

impl LineItemExtractionEngine {
    pub fn new() -> Self {
        Self {
            sequential: SequentialStrategy::default(),
            pattern: PatternStrategy::default(),
            min_sequential_items: DEFAULT_MIN_SEQUENTIAL_ITEMS,
        }
    }

    /// Set the low-confidence threshold for the sequential result.
    pub fn with_min_sequential_items(mut self, min: usize) -> Self {
        self.min_sequential_items = min;
        self
    }

    pub fn min_sequential_items(&self) -> usize {
        self.min_sequential_items
    }

    /// Final ordered line items.
    pub fn extract(&self, text: &str) -> Vec<LineItem> {
        self.extract_with_strategy(text).1
    }

    /// Final line items together with the strategy that produced them.
    pub fn extract_with_strategy(&self, text: &str) -> (StrategyKind, Vec<LineItem>) {
        let text = normalize_line_endings(text);

        if TableRegion::locate(&text).is_none() {
            let items = self.pattern.extract(&text);
            info!("No item table region, pattern strategy found {} items", items.len());
            return (self.pattern.kind(), items);
        }

        let primary = self.sequential.extract(&text);
        if primary.len() >= self.min_sequential_items {
            debug!("Sequential strategy found {} items", primary.len());
            return (self.sequential.kind(), primary);
        }

        let fallback = self.pattern.extract(&text);
        info!(
            "Sequential strategy found {} items (< {}), pattern strategy found {}",
            primary.len(),
            self.min_sequential_items,
            fallback.len()
        );
        select_items(primary, fallback)
    }
}

impl Default for LineItemExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract line items with the default engine.
pub fn extract_line_items(text: &str) -> Vec<LineItem> {
    LineItemExtractionEngine::new().extract(text)
}
