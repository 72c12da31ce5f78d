//! Persistence collaborators for finished batches.
//!
//! # Submodules
//!
//! - [`csv`]: one row per target, fixed column order, sentinels included
//! - [`json`]: full run report with statuses, diagnostics and timestamps
//!
//! # Column Order
//!
//! ```text
//! url, <attribute 1>, <attribute 2>, ..., status
//! ```
//!
//! Attribute columns follow configuration order.

use thiserror::Error;

pub mod csv;
pub mod json;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
