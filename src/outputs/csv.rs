//! CSV output.

use super::OutputError;
use crate::models::BatchResult;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Leading column holding the visited address.
pub const URL_COLUMN: &str = "url";
/// Trailing column holding the visit status.
pub const STATUS_COLUMN: &str = "status";

/// Render a batch as CSV.
///
/// The header is `url`, one column per name in `attribute_names`, then
/// `status`. Every visit gets a row; attributes it could not extract are
/// written as the `N/A` sentinel.
///
/// # Arguments
///
/// * `batch` - Visit results, already in input order
/// * `attribute_names` - Attribute columns, in configuration order
///
/// # Returns
///
/// The rendered CSV document, header line included.
///
/// # Errors
///
/// Returns [`OutputError::Csv`] if the writer rejects a record.
pub fn render_csv(batch: &BatchResult, attribute_names: &[&str]) -> Result<String, OutputError> {
    let mut writer = ::csv::Writer::from_writer(vec![]);

    let mut header = Vec::with_capacity(attribute_names.len() + 2);
    header.push(URL_COLUMN);
    header.extend_from_slice(attribute_names);
    header.push(STATUS_COLUMN);
    writer.write_record(&header)?;

    for visit in batch {
        let mut row = Vec::with_capacity(header.len());
        row.push(visit.target().as_str());
        row.extend(attribute_names.iter().map(|name| visit.attribute(name).as_str()));
        row.push(visit.status().as_str());
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `batch` to `path` as CSV, replacing any existing file.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the file cannot be written, or
/// [`OutputError::Csv`] if rendering fails.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_csv(
    batch: &BatchResult,
    attribute_names: &[&str],
    path: &Path,
) -> Result<(), OutputError> {
    let rendered = render_csv(batch, attribute_names)?;
    fs::write(path, rendered).await.map_err(|source| OutputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(rows = batch.len(), "Wrote CSV");
    Ok(())
}
