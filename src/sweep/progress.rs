//! Progress reporting collaborators.

use crate::models::{Target, VisitStatus};
use tracing::{info, warn};

/// One observation, emitted after each visit.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based position of the target in the batch.
    pub index: usize,
    pub total: usize,
    pub target: &'a Target,
    pub status: VisitStatus,
    pub diagnostic: Option<&'a str>,
}

/// Receives progress observations. Nothing it returns is consumed.
pub trait ProgressReporter {
    /// Called once per target, after its visit finished.
    fn report(&mut self, progress: Progress<'_>);
}

impl<F> ProgressReporter for F
where
    F: FnMut(Progress<'_>),
{
    fn report(&mut self, progress: Progress<'_>) {
        self(progress)
    }
}

/// Logs every observation through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&mut self, p: Progress<'_>) {
        match p.status {
            VisitStatus::Extracted => info!(
                index = p.index,
                total = p.total,
                target = %p.target,
                status = %p.status,
                "[{}/{}] visited",
                p.index,
                p.total
            ),
            VisitStatus::Blocked | VisitStatus::Error => warn!(
                index = p.index,
                total = p.total,
                target = %p.target,
                status = %p.status,
                diagnostic = p.diagnostic.unwrap_or_default(),
                "[{}/{}] visited",
                p.index,
                p.total
            ),
        }
    }
}
