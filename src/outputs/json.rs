//! JSON run report.
//!
//! Unlike the CSV, the report keeps each visit's diagnostic, so blocked and
//! failed targets can be told apart without re-running them.
//!
//! # Output Structure
//!
//! ```text
//! {
//!   "started_at": "2025-05-06T09:00:00Z",
//!   "finished_at": "2025-05-06T09:02:41Z",
//!   "attributes": ["name", "headline", ...],
//!   "summary": { "total": 11, "extracted": 7, "blocked": 3, "error": 1 },
//!   "results": [ { "target": ..., "status": ..., "attributes": {...}, "diagnostic": ... } ]
//! }
//! ```

use super::OutputError;
use crate::models::{BatchResult, BatchSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// A finished run, ready to serialize.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub attributes: &'a [&'a str],
    pub summary: BatchSummary,
    pub results: &'a BatchResult,
}

impl<'a> RunReport<'a> {
    /// Assemble a report; the per-status summary is computed from `results`.
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        attributes: &'a [&'a str],
        results: &'a BatchResult,
    ) -> Self {
        Self {
            started_at,
            finished_at,
            attributes,
            summary: results.summary(),
            results,
        }
    }
}

/// Write `report` to `path` as pretty-printed JSON, creating parent directories.
///
/// # Arguments
///
/// * `report` - The finished run
/// * `path` - Destination file, replaced if it exists
///
/// # Errors
///
/// Returns [`OutputError::Json`] if serialization fails and
/// [`OutputError::Io`] if the directory or file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &RunReport<'_>, path: &Path) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create report dir");
            return Err(OutputError::Io {
                path: parent.display().to_string(),
                source: e,
            });
        }
    }

    fs::write(path, json).await.map_err(|source| OutputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(results = report.results.len(), "Wrote JSON report");
    Ok(())
}
