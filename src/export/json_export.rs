//! JSON session export.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::state::SessionMetrics;

/// Export format version
pub const EXPORT_VERSION: &str = "1.0.0";

/// Full state export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    /// Export version for compatibility
    pub version: String,
    /// Session metrics snapshot
    pub metrics: SessionMetrics,
}

impl SessionExport {
    fn now(metrics: &SessionMetrics) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: EXPORT_VERSION.to_string(),
            metrics: metrics.clone(),
        }
    }
}

/// Export session state to `exports/session_YYYYMMDD_HHMMSS.json`
///
/// Returns the path to the saved JSON file.
pub fn export_session_json(metrics: &SessionMetrics) -> Result<PathBuf> {
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    let filename = format!("session_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);

    export_session_json_to(metrics, &path)?;
    Ok(path)
}

/// Export session state to a specific file
pub fn export_session_json_to(metrics: &SessionMetrics, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &SessionExport::now(metrics))?;

    log::info!("JSON state exported: {}", path.display());
    Ok(())
}
