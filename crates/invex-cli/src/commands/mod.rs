//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use invex_core::models::config::InvexConfig;
use invex_core::models::document::ExtractionResult;
use invex_core::process_document;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invex")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvexConfig> {
    if let Some(path) = config_path {
        return Ok(InvexConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(InvexConfig::from_file(&default_path)?)
    } else {
        Ok(InvexConfig::default())
    }
}

/// Acquire text for one document and extract it.
///
/// The work runs on the blocking pool under the configured timeout; nothing
/// is shared between documents besides the read-only configuration. OCR
/// processes are killed by the source itself once the same deadline passes.
pub async fn extract_file(
    path: PathBuf,
    config: Arc<InvexConfig>,
    cleanup: bool,
) -> anyhow::Result<ExtractionResult> {
    let source_id = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let timeout = Duration::from_secs(config.source.timeout_secs);
    let task = tokio::task::spawn_blocking(move || process_document(&path, &config, cleanup));

    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => {
            let result = joined??;
            debug!("Extracted {} line items from {}", result.line_items.len(), source_id);
            Ok(result)
        }
        Err(_) => anyhow::bail!(
            "Timed out after {}s acquiring text for {}",
            timeout.as_secs(),
            source_id
        ),
    }
}
