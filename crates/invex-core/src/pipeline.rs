//! Text acquisition, extraction and optional cleanup for one document.

use std::path::Path;

use tracing::debug;

use crate::cleanup::{CleanupService, RuleBasedCleanup};
use crate::extract::{DocumentExtractor, DocumentParser};
use crate::models::config::InvexConfig;
use crate::models::document::ExtractionResult;
use crate::source::acquire_text;
use crate::Result;

/// Process the document at `path` with `config`.
///
/// Cleanup runs when `cleanup` is set or enabled in the configuration.
pub fn process_document(path: &Path, config: &InvexConfig, cleanup: bool) -> Result<ExtractionResult> {
    let source_id = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    let source_text = acquire_text(path, &config.source)?;
    debug!(
        "Acquired {} characters for {} (confidence {:.2})",
        source_text.text.len(),
        source_id,
        source_text.confidence
    );

    let result = DocumentParser::from_config(&config.extraction)
        .extract_document(&source_text.text, source_id)?;

    if cleanup || config.cleanup.enabled {
        let service = RuleBasedCleanup::from_config(&config.cleanup);
        debug!("Running {} cleanup on {}", service.name(), source_id);
        return service.clean(result);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvexError, SourceError};

    const INVOICE: &str = "\
INVOICE # 31
DATE: 03/14/2024
QUANTITY DESCRIPTION UNIT PRICE TOTAL
2 Hinge 3.00 6.00
SUBTOTAL 6.00
";

    #[test]
    fn test_process_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.txt");
        std::fs::write(&path, INVOICE).unwrap();

        let result = process_document(&path, &InvexConfig::default(), false).unwrap();
        assert_eq!(result.source_id, "inv.txt");
        assert_eq!(result.line_items.len(), 1);
        assert_eq!(result.header.get("date"), Some("03/14/2024"));

        let cleaned = process_document(&path, &InvexConfig::default(), true).unwrap();
        assert_eq!(cleaned.header.get("date"), Some("2024-03-14"));
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let err = process_document(Path::new("/nonexistent/inv.txt"), &InvexConfig::default(), false)
            .unwrap_err();
        assert!(matches!(err, InvexError::Source(SourceError::NotFound(_))));
    }

    #[test]
    fn test_blank_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n").unwrap();

        let err = process_document(&path, &InvexConfig::default(), false).unwrap_err();
        assert!(matches!(err, InvexError::Source(SourceError::Empty(_))));
        assert!(err.to_string().contains("no text produced"));
    }
}
