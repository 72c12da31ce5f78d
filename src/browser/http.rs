//! Static HTTP backend.
//!
//! Fetches each target with a single GET and answers queries against the
//! returned markup. There is no JavaScript engine, so lazily loaded content
//! never appears and [`Browser::scroll_to_bottom`] does nothing.

use super::{dom, Browser, BrowserError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug)]
struct LoadedPage {
    address: String,
    html: String,
}

/// A [`Browser`] backed by plain HTTP requests.
#[derive(Debug)]
pub struct HttpBrowser {
    client: Client,
    page: Option<LoadedPage>,
}

impl HttpBrowser {
    /// Build the HTTP client. Every request carries `user_agent` and fails
    /// after `timeout`.
    pub fn launch(user_agent: &str, timeout: Duration) -> Result<Self, BrowserError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        debug!(?timeout, "HTTP browser ready");
        Ok(Self { client, page: None })
    }

    fn html(&self) -> Result<&str, BrowserError> {
        self.page
            .as_ref()
            .map(|p| p.html.as_str())
            .ok_or(BrowserError::NoPage)
    }
}

impl Browser for HttpBrowser {
    #[instrument(level = "debug", skip(self))]
    async fn navigate(&mut self, address: &str) -> Result<(), BrowserError> {
        self.page = None;
        let url = Url::parse(address).map_err(|e| BrowserError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        let navigation = |e: reqwest::Error| BrowserError::Navigation {
            address: address.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(navigation)?
            .error_for_status()
            .map_err(navigation)?;
        let html = response.text().await.map_err(navigation)?;
        debug!(bytes = html.len(), "Fetched page");

        self.page = Some(LoadedPage {
            address: address.to_string(),
            html,
        });
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        let page = self.page.as_ref().ok_or(BrowserError::NoPage)?;
        debug!(address = %page.address, "Static page has no lazy content; skipping scroll");
        Ok(())
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        dom::first_text(self.html()?, selector)
    }

    async fn query_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, BrowserError> {
        dom::first_attribute(self.html()?, selector, attribute)
    }

    async fn content_prefix(&self, max_chars: usize) -> Result<String, BrowserError> {
        Ok(dom::char_prefix(self.html()?, max_chars))
    }

    async fn close(self) -> Result<(), BrowserError> {
        debug!("HTTP browser closed");
        Ok(())
    }
}
