//! UTF-8 text files.

use std::path::Path;

use tracing::debug;

use super::{require_text, Result, SourceOptions, SourceText, TextSource};

/// Reads documents that are already plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl PlainTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PlainTextSource {
    fn name(&self) -> &str {
        "plain_text"
    }

    fn extract(&self, path: &Path, _options: &SourceOptions) -> Result<SourceText> {
        let text = std::fs::read_to_string(path)?;
        debug!("Read {} bytes from {}", text.len(), path.display());

        let text = require_text(self.name(), text, 0)?;
        Ok(SourceText::new(text, 1.0).with_metadata("method", "plain_text"))
    }
}
