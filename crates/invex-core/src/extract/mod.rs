//! Document field and line-item extraction.

mod assembler;
mod classifier;
mod dedup;
mod engine;
mod normalizer;
mod parser;
mod pattern;
pub mod rules;

pub use assembler::{AssemblyState, SequentialItemAssembler};
pub use classifier::{classify_line, split_trailing_prices, LineClass, PricePair};
pub use dedup::{dedup_items, ItemDeduplicator};
pub use engine::{
    extract_line_items, select_items, ItemExtractionStrategy, LineItemExtractionEngine,
    PatternStrategy, SequentialStrategy, DEFAULT_MIN_SEQUENTIAL_ITEMS,
};
pub use normalizer::{normalize_line_endings, physical_lines, TableRegion};
pub use parser::{DocumentExtractor, DocumentParser};
pub use pattern::{ItemTemplate, PatternItemExtractor};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
