//! Batch orchestration: one browser session, many targets, one result each.

use super::block::BlockDetector;
use super::progress::{Progress, ProgressReporter};
use super::visitor::TargetVisitor;
use crate::browser::Browser;
use crate::models::{AttributeSpec, BatchResult, Target};
use crate::pacing::Pacing;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Runs batches of visits with a fixed attribute set, wall detector and pacing.
#[derive(Debug, Clone)]
pub struct Sweeper {
    attributes: Vec<AttributeSpec>,
    detector: BlockDetector,
    pacing: Pacing,
}

impl Sweeper {
    /// Create a sweeper.
    ///
    /// # Arguments
    ///
    /// * `attributes` - The closed attribute set, in output column order
    /// * `detector` - Wall detector run before and after extraction
    /// * `pacing` - Randomized waits; use [`Pacing::none`] to disable them
    pub fn new(attributes: Vec<AttributeSpec>, detector: BlockDetector, pacing: Pacing) -> Self {
        Self {
            attributes,
            detector,
            pacing,
        }
    }

    /// Visit every target in order and collect one result per target.
    ///
    /// Takes ownership of the acquired `browser` and closes it after the last
    /// visit. Visits never fail outward, so the session is released whatever
    /// happened to individual targets; a failed release is only logged.
    ///
    /// The `between_visits` wait runs before every visit except the first,
    /// never after the last one.
    ///
    /// # Arguments
    ///
    /// * `browser` - An acquired session, released exactly once
    /// * `targets` - Addresses to visit; duplicates are visited again
    /// * `reporter` - Receives one [`Progress`] after each visit
    ///
    /// # Returns
    ///
    /// A [`BatchResult`] with `targets.len()` entries in input order. An empty
    /// target list yields an empty batch.
    #[instrument(level = "info", skip_all, fields(total = targets.len()))]
    pub async fn run<B, R>(&self, mut browser: B, targets: &[Target], reporter: &mut R) -> BatchResult
    where
        B: Browser,
        R: ProgressReporter + ?Sized,
    {
        let started = Instant::now();
        let visitor = TargetVisitor::new(&self.attributes, &self.detector, &self.pacing);
        let total = targets.len();
        let mut batch = BatchResult::with_capacity(total);

        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                self.pacing.between_visits.wait("between_visits").await;
            }

            let result = visitor.visit(&mut browser, target).await;
            reporter.report(Progress {
                index: i + 1,
                total,
                target,
                status: result.status(),
                diagnostic: result.diagnostic(),
            });
            batch.push(result);
        }

        if let Err(e) = browser.close().await {
            warn!(error = %e, "Failed to release browser session");
        }

        let summary = batch.summary();
        info!(
            total = summary.total,
            extracted = summary.extracted,
            blocked = summary.blocked,
            error = summary.error,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch complete"
        );
        batch
    }
}
