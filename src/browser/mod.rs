//! Browser automation collaborators.
//!
//! The extraction engine only talks to a page through the [`Browser`] trait.
//! One implementation owns one browser session for a whole run; the batch
//! orchestrator lends it to each visit by `&mut`, so two visits can never be
//! in flight against the same session.
//!
//! # Backends
//!
//! | Backend | Module | Notes |
//! |---------|--------|-------|
//! | Static HTTP | [`http`] | `reqwest` + `scraper`; no JavaScript, scrolling is a no-op |
//! | WebDriver | `webdriver` | Chrome via `thirtyfour`, behind the `webdriver` feature |

use thiserror::Error;

pub mod dom;
pub mod http;
#[cfg(test)]
pub mod stub;
#[cfg(feature = "webdriver")]
pub mod webdriver;

/// Failures raised by a browser collaborator.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("navigation to {address} failed: {reason}")]
    Navigation { address: String, reason: String },

    #[error("no page loaded")]
    NoPage,

    #[error("invalid selector {selector}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("browser session error: {0}")]
    Session(String),
}

/// A single browser session, driven one page at a time.
///
/// Queries take `&self` and never change the loaded page; navigation and
/// scrolling take `&mut self`.
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Load `address`, replacing the current page.
    ///
    /// # Errors
    ///
    /// - [`BrowserError::InvalidAddress`] if `address` cannot be parsed
    /// - [`BrowserError::Navigation`] if the page cannot be loaded
    async fn navigate(&mut self, address: &str) -> Result<(), BrowserError>;

    /// Scroll to the bottom of the current page to trigger lazy content.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::NoPage`] if nothing is loaded, or
    /// [`BrowserError::Script`] if the scroll cannot run.
    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError>;

    /// Text of the first element matching `selector`.
    ///
    /// # Arguments
    ///
    /// * `selector` - A CSS selector
    ///
    /// # Returns
    ///
    /// `Some(text)` for the first match (possibly blank), `None` when nothing
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Selector`] for an unparsable selector and
    /// [`BrowserError::NoPage`] when nothing is loaded.
    async fn query_text(&self, selector: &str) -> Result<Option<String>, BrowserError>;

    /// Value of `attribute` on the first element matching `selector`.
    ///
    /// # Returns
    ///
    /// `None` when no element matches or the first match lacks `attribute`.
    ///
    /// # Errors
    ///
    /// Same as [`Browser::query_text`].
    async fn query_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// At most `max_chars` characters from the start of the rendered page source.
    ///
    /// Counted in characters, never bytes, so a multi-byte character is
    /// never split.
    async fn content_prefix(&self, max_chars: usize) -> Result<String, BrowserError>;

    /// Release the session. Consumes the browser so it cannot be used again.
    async fn close(self) -> Result<(), BrowserError>;
}
