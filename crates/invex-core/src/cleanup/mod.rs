//! Post-extraction cleanup of OCR artefacts.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::config::CleanupConfig;
use crate::models::document::ExtractionResult;
use crate::Result;

/// A stage that refines an extraction result.
pub trait CleanupService: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Return the cleaned result.
    fn clean(&self, result: ExtractionResult) -> Result<ExtractionResult>;
}

/// Common OCR misreadings and their corrections.
const CORRECTIONS: [(&str, &str); 7] = [
    ("invOice", "invoice"),
    ("inv0ice", "invoice"),
    ("arnount", "amount"),
    ("arn0unt", "amount"),
    ("nurnber", "number"),
    ("custorner", "customer"),
    ("payrnent", "payment"),
];

/// Date layouts accepted by the normaliser, tried in order.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m.%d.%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

lazy_static! {
    /// `rn` standing alone is almost always a misread `m`.
    static ref STANDALONE_RN: Regex = Regex::new(r"(?i)\brn\b").unwrap();
}

/// Deterministic cleanup: typo corrections, glyph fixes, trimming and ISO
/// dates. Line items are left untouched.
#[derive(Debug, Clone)]
pub struct RuleBasedCleanup {
    fix_ocr_patterns: bool,
}

impl RuleBasedCleanup {
    pub fn new() -> Self {
        Self {
            fix_ocr_patterns: true,
        }
    }

    pub fn from_config(config: &CleanupConfig) -> Self {
        Self::new().with_ocr_pattern_fixes(config.fix_ocr_patterns)
    }

    /// Toggle the stand-alone `rn` -> `m` fix.
    pub fn with_ocr_pattern_fixes(mut self, enabled: bool) -> Self {
        self.fix_ocr_patterns = enabled;
        self
    }

    /// Apply typo corrections (and glyph fixes when enabled) to `text`.
    pub fn clean_text(&self, text: &str) -> String {
        let mut text = CORRECTIONS
            .iter()
            .fold(text.to_string(), |acc, (wrong, right)| acc.replace(wrong, right));

        if self.fix_ocr_patterns {
            text = STANDALONE_RN.replace_all(&text, "m").into_owned();
        }
        text
    }

    fn clean_field(&self, name: &str, value: String) -> String {
        let value = self.clean_text(value.trim());
        if is_date_field(name) {
            normalize_date(&value).unwrap_or(value)
        } else {
            value
        }
    }
}

impl Default for RuleBasedCleanup {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanupService for RuleBasedCleanup {
    fn name(&self) -> &str {
        "rules"
    }

    fn clean(&self, mut result: ExtractionResult) -> Result<ExtractionResult> {
        result.header = result
            .header
            .map_values(|name, value| self.clean_field(name, value));
        result.raw_text = self.clean_text(&result.raw_text);

        debug!("Cleaned {} header fields of {}", result.header.len(), result.source_id);
        Ok(result)
    }
}

fn is_date_field(name: &str) -> bool {
    name == "date" || name.ends_with("_date")
}

/// Reformat a date as `YYYY-MM-DD` if it matches a known layout.
pub fn normalize_date(value: &str) -> Option<String> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}
