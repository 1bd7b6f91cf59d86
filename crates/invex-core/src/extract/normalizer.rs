//! Physical line splitting and item table region isolation.

use std::borrow::Cow;

use tracing::debug;

use super::rules::patterns::{TABLE_END, TABLE_HEADER};

/// Item table: the span between the column header row and the first
/// subtotal marker after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRegion<'a> {
    text: &'a str,
}

impl<'a> TableRegion<'a> {
    /// Locate the table region; `None` when the header or the subtotal marker
    /// is missing.
    pub fn locate(text: &'a str) -> Option<Self> {
        let header = TABLE_HEADER.find(text)?;
        let rest = &text[header.end()..];
        let Some(end) = TABLE_END.find(rest) else {
            debug!("Item table header found without a subtotal marker");
            return None;
        };

        debug!(
            "Item table region at bytes {}..{}",
            header.end(),
            header.end() + end.start()
        );
        Some(Self {
            text: &rest[..end.start()],
        })
    }

    /// Raw region text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Non-empty trimmed lines of the region.
    pub fn lines(&self) -> Vec<&'a str> {
        physical_lines(self.text)
    }
}

/// Split text into trimmed, non-empty lines, order preserved.
pub fn physical_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
