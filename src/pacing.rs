//! Randomized waits between and inside visits.
//!
//! Every wait is drawn uniformly from a [`DelayRange`]. Ranges are
//! configuration, not constants: the defaults reproduce a slow, human-like
//! cadence, while tests and `--no-pacing` use [`Pacing::none`] so no wait
//! ever sleeps.

use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Inclusive millisecond range a delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange { min_ms: 0, max_ms: 0 };

    /// A range from `min_ms` to `max_ms`, both inclusive.
    pub const fn millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// `false` when `min_ms` exceeds `max_ms`; configuration rejects those.
    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }

    /// Draw a delay uniformly from the range.
    ///
    /// # Returns
    ///
    /// `min_ms` for a degenerate range, otherwise a random duration in
    /// `min_ms..=max_ms`.
    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng().random_range(self.min_ms..=self.max_ms))
    }

    /// Sleep for a sampled duration; returns immediately for a zero delay.
    pub async fn wait(&self, what: &'static str) {
        let delay = self.sample();
        if delay.is_zero() {
            return;
        }
        debug!(?delay, what, "Waiting");
        sleep(delay).await;
    }
}

/// The three waits applied during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Pacing {
    /// After navigation, before scrolling.
    pub settle: DelayRange,
    /// After scrolling, before the first block check.
    pub after_scroll: DelayRange,
    /// Before every visit except the first.
    pub between_visits: DelayRange,
}

impl Pacing {
    /// No waits at all, for tests and `--no-pacing`.
    pub const fn none() -> Self {
        Self {
            settle: DelayRange::ZERO,
            after_scroll: DelayRange::ZERO,
            between_visits: DelayRange::ZERO,
        }
    }

    pub fn ranges(&self) -> [(&'static str, DelayRange); 3] {
        [
            ("settle", self.settle),
            ("after_scroll", self.after_scroll),
            ("between_visits", self.between_visits),
        ]
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle: DelayRange::millis(4_000, 7_000),
            after_scroll: DelayRange::millis(2_000, 2_000),
            between_visits: DelayRange::millis(5_000, 10_000),
        }
    }
}
