//! One target's visit, from navigation to a finished [`VisitResult`].
//!
//! ```text
//! NAVIGATING -> SETTLING -> BLOCK_CHECK -> EXTRACTING -> LATE_BLOCK_CHECK -> DONE
//!      \____________\____________\____________\_______________\____> ERROR
//! ```
//!
//! Every fault, including a panic inside the browser collaborator, is caught
//! here and turned into an `error` result. Nothing escapes to the batch.

use super::block::BlockDetector;
use super::extractor::extract;
use crate::browser::{Browser, BrowserError};
use crate::models::{AttributeSpec, Attributes, Target, VisitResult};
use crate::pacing::Pacing;
use crate::utils::truncate_for_log;
use futures::FutureExt;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Navigating,
    Settling,
    BlockCheck,
    Extracting,
    LateBlockCheck,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Navigating => "navigation",
            Phase::Settling => "settling",
            Phase::BlockCheck => "block check",
            Phase::Extracting => "extraction",
            Phase::LateBlockCheck => "late block check",
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Visits single targets with a fixed attribute set, detector and pacing.
#[derive(Debug, Clone, Copy)]
pub struct TargetVisitor<'a> {
    attributes: &'a [AttributeSpec],
    detector: &'a BlockDetector,
    pacing: &'a Pacing,
}

impl<'a> TargetVisitor<'a> {
    /// Borrow the batch's attribute set, detector and pacing for a run of visits.
    pub fn new(attributes: &'a [AttributeSpec], detector: &'a BlockDetector, pacing: &'a Pacing) -> Self {
        Self {
            attributes,
            detector,
            pacing,
        }
    }

    /// Visit `target` with `browser` and produce its only [`VisitResult`].
    ///
    /// Navigates, waits `settle`, scrolls once, waits `after_scroll`, then
    /// checks for a wall. A wall on load skips extraction; a wall that shows
    /// up during extraction discards every value extracted.
    ///
    /// # Arguments
    ///
    /// * `browser` - The batch's session, borrowed for this visit only
    /// * `target` - Address to load
    ///
    /// # Returns
    ///
    /// - `extracted` with one outcome per configured attribute, or
    /// - `blocked` with every attribute unavailable, or
    /// - `error` with every attribute unavailable and a diagnostic naming the
    ///   phase that failed. Panics raised by `browser` end up here too.
    #[instrument(level = "info", skip_all, fields(target = %target))]
    pub async fn visit<B: Browser>(&self, browser: &mut B, target: &Target) -> VisitResult {
        let phase = Cell::new(Phase::Navigating);
        let outcome = AssertUnwindSafe(self.run_phases(browser, target, &phase))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                let phase = phase.get();
                warn!(%phase, error = %e, "Visit failed");
                VisitResult::error(target.clone(), self.attributes, format!("{phase}: {e}"))
            }
            Err(payload) => {
                let phase = phase.get();
                let message = panic_message(payload.as_ref());
                error!(%phase, panic = message, "Visit panicked");
                VisitResult::error(
                    target.clone(),
                    self.attributes,
                    format!("{phase}: unexpected fault: {message}"),
                )
            }
        }
    }

    async fn run_phases<B: Browser>(
        &self,
        browser: &mut B,
        target: &Target,
        phase: &Cell<Phase>,
    ) -> Result<VisitResult, BrowserError> {
        phase.set(Phase::Navigating);
        browser.navigate(target.as_str()).await?;

        phase.set(Phase::Settling);
        self.pacing.settle.wait("settle").await;
        browser.scroll_to_bottom().await?;
        self.pacing.after_scroll.wait("after_scroll").await;

        phase.set(Phase::BlockCheck);
        if let Some(signature) = self.detector.detect(&*browser).await? {
            info!(%signature, "Content wall detected; skipping extraction");
            return Ok(VisitResult::blocked(
                target.clone(),
                self.attributes,
                format!("content wall detected on load (signature {signature:?})"),
            ));
        }

        phase.set(Phase::Extracting);
        let mut pairs = Vec::with_capacity(self.attributes.len());
        for spec in self.attributes {
            let outcome = extract(&*browser, spec).await;
            pairs.push((spec.name.clone(), outcome));
        }
        let attributes = Attributes::from_pairs(pairs);

        phase.set(Phase::LateBlockCheck);
        if let Some(signature) = self.detector.detect(&*browser).await? {
            warn!(
                %signature,
                discarded = attributes.available_count(),
                "Content wall appeared after extraction; discarding values"
            );
            return Ok(VisitResult::blocked(
                target.clone(),
                self.attributes,
                format!("content wall detected after extraction (signature {signature:?})"),
            ));
        }

        let summary = attributes
            .iter()
            .take(2)
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(" - ");
        info!(
            available = attributes.available_count(),
            configured = attributes.len(),
            preview = %truncate_for_log(&summary, 120),
            "Extracted attributes"
        );
        Ok(VisitResult::extracted(target.clone(), attributes))
    }
}
