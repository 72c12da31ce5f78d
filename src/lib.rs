//! # Profile Sweep
//!
//! Visits a list of public profile pages through a browser-automation
//! backend and extracts a fixed set of attributes from each one, tolerating
//! markup drift, content walls and per-page failures.
//!
//! ## Architecture
//!
//! 1. **Extraction**: each attribute is tried with layered selector
//!    strategies; misses become the `N/A` sentinel ([`sweep::extractor`])
//! 2. **Wall detection**: a bounded prefix of the page is checked for login
//!    wall signatures, before and after extraction ([`sweep::block`])
//! 3. **Visiting**: one target, one [`models::VisitResult`], every fault
//!    contained ([`sweep::visitor`])
//! 4. **Orchestration**: targets visited one at a time over a single browser
//!    session with randomized pacing ([`sweep::orchestrator`])
//! 5. **Output**: CSV rows and an optional JSON report ([`outputs`])

pub mod browser;
pub mod cli;
pub mod config;
pub mod models;
pub mod outputs;
pub mod pacing;
pub mod sweep;
pub mod utils;
