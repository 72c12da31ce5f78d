//! The extraction engine.
//!
//! Leaf-first:
//!
//! - [`extractor`]: one attribute, first successful strategy wins
//! - [`block`]: content-wall detection over a bounded page prefix
//! - [`visitor`]: one target's full visit, faults contained
//! - [`orchestrator`]: sequential batch over a single browser session
//! - [`progress`]: where per-visit observations go

pub mod block;
pub mod extractor;
pub mod orchestrator;
pub mod progress;
pub mod visitor;

pub use block::BlockDetector;
pub use orchestrator::Sweeper;
pub use progress::{Progress, ProgressReporter, TracingReporter};
