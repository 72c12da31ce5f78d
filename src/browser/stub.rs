//! Deterministic in-memory browser for tests.

use super::{dom, Browser, BrowserError};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
struct StubPage {
    html: String,
    /// Served by `content_prefix` from its second read on.
    late_html: Option<String>,
    panic_on_query: bool,
}

/// A call made against the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubEvent {
    /// Navigation attempt, recorded whether or not it succeeded.
    Navigate(String),
    Scroll,
    ContentRead,
    Close,
}

/// A [`StubEvent`] with the (tokio) time it happened.
#[derive(Debug, Clone)]
pub struct Logged {
    pub at: Instant,
    pub event: StubEvent,
}

pub type EventLog = Arc<Mutex<Vec<Logged>>>;

/// Canned pages keyed by address. Unknown addresses fail navigation.
#[derive(Debug, Default)]
pub struct StubBrowser {
    pages: HashMap<String, StubPage>,
    current: Option<String>,
    prefix_reads: Cell<usize>,
    closes: Arc<AtomicUsize>,
    events: EventLog,
}

impl StubBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, address: &str, html: &str) -> Self {
        self.pages.insert(
            address.to_string(),
            StubPage {
                html: html.to_string(),
                ..StubPage::default()
            },
        );
        self
    }

    /// A page whose source changes to `late_html` after the first content read.
    pub fn late_page(mut self, address: &str, html: &str, late_html: &str) -> Self {
        self.pages.insert(
            address.to_string(),
            StubPage {
                html: html.to_string(),
                late_html: Some(late_html.to_string()),
                panic_on_query: false,
            },
        );
        self
    }

    /// A page that loads fine but panics on the first element query.
    pub fn panicking_page(mut self, address: &str, html: &str) -> Self {
        self.pages.insert(
            address.to_string(),
            StubPage {
                html: html.to_string(),
                late_html: None,
                panic_on_query: true,
            },
        );
        self
    }

    /// Number of times `close` has been called, readable after the browser is consumed.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }

    /// Every call made so far, readable after the browser is consumed.
    pub fn event_log(&self) -> EventLog {
        Arc::clone(&self.events)
    }

    fn record(&self, event: StubEvent) {
        self.events.lock().unwrap().push(Logged {
            at: Instant::now(),
            event,
        });
    }

    fn current(&self) -> Result<&StubPage, BrowserError> {
        self.current
            .as_ref()
            .and_then(|a| self.pages.get(a))
            .ok_or(BrowserError::NoPage)
    }

    fn queryable(&self) -> Result<&str, BrowserError> {
        let page = self.current()?;
        if page.panic_on_query {
            panic!("stub page exploded during query");
        }
        Ok(&page.html)
    }
}

impl Browser for StubBrowser {
    async fn navigate(&mut self, address: &str) -> Result<(), BrowserError> {
        self.record(StubEvent::Navigate(address.to_string()));
        self.current = None;
        self.prefix_reads.set(0);
        if !self.pages.contains_key(address) {
            return Err(BrowserError::Navigation {
                address: address.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        self.current = Some(address.to_string());
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.current()?;
        self.record(StubEvent::Scroll);
        Ok(())
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        dom::first_text(self.queryable()?, selector)
    }

    async fn query_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, BrowserError> {
        dom::first_attribute(self.queryable()?, selector, attribute)
    }

    async fn content_prefix(&self, max_chars: usize) -> Result<String, BrowserError> {
        let page = self.current()?;
        self.record(StubEvent::ContentRead);
        let reads = self.prefix_reads.get();
        self.prefix_reads.set(reads + 1);
        let source = match (&page.late_html, reads) {
            (Some(late), n) if n > 0 => late,
            _ => &page.html,
        };
        Ok(dom::char_prefix(source, max_chars))
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.record(StubEvent::Close);
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
