//! Chrome over the WebDriver protocol.
//!
//! Requires a running chromedriver (or Selenium grid) at the configured URL.
//! Launch options hide the usual automation fingerprints: headless mode,
//! a spoofed user agent, the `AutomationControlled` blink feature disabled, the
//! automation switch and extension turned off, and `navigator.webdriver`
//! masked after start-up.

use super::{dom, Browser, BrowserError};
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};
use tracing::{debug, info, instrument};

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
const MASK_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => false});";

fn session(e: WebDriverError) -> BrowserError {
    BrowserError::Session(e.to_string())
}

/// Launch options for [`WebDriverBrowser`].
#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    /// chromedriver or Selenium endpoint, e.g. `http://localhost:9515`.
    pub server_url: String,
    pub headless: bool,
    pub user_agent: String,
}

/// Chrome capabilities carrying the launch options.
fn chrome_capabilities(options: &WebDriverOptions) -> Result<ChromeCapabilities, BrowserError> {
    let mut caps = DesiredCapabilities::chrome();
    if options.headless {
        caps.add_arg("--headless").map_err(session)?;
    }
    for arg in [
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-blink-features=AutomationControlled",
    ] {
        caps.add_arg(arg).map_err(session)?;
    }
    caps.add_arg(&format!("--user-agent={}", options.user_agent))
        .map_err(session)?;
    caps.add_experimental_option("excludeSwitches", vec!["enable-automation"])
        .map_err(session)?;
    caps.add_experimental_option("useAutomationExtension", false)
        .map_err(session)?;
    Ok(caps)
}

/// A [`Browser`] driving a real Chrome session.
pub struct WebDriverBrowser {
    driver: WebDriver,
}

impl WebDriverBrowser {
    /// Start a Chrome session on the WebDriver server at `options.server_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Session`] if the capabilities are rejected or
    /// the server cannot start a session, and [`BrowserError::Script`] if
    /// the `navigator.webdriver` mask fails.
    #[instrument(level = "info", skip_all, fields(server = %options.server_url))]
    pub async fn launch(options: &WebDriverOptions) -> Result<Self, BrowserError> {
        let caps = chrome_capabilities(options)?;
        let driver = WebDriver::new(options.server_url.as_str(), caps)
            .await
            .map_err(session)?;
        driver
            .execute(MASK_WEBDRIVER, Vec::new())
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;

        info!(headless = options.headless, "WebDriver session started");
        Ok(Self { driver })
    }
}

impl Browser for WebDriverBrowser {
    #[instrument(level = "debug", skip(self))]
    async fn navigate(&mut self, address: &str) -> Result<(), BrowserError> {
        url::Url::parse(address).map_err(|e| BrowserError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        self.driver
            .goto(address)
            .await
            .map_err(|e| BrowserError::Navigation {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.driver
            .execute(SCROLL_TO_BOTTOM, Vec::new())
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Script(e.to_string()))
    }

    async fn query_text(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        let found = self
            .driver
            .find_all(By::Css(selector))
            .await
            .map_err(session)?;
        match found.into_iter().next() {
            Some(element) => Ok(Some(element.text().await.map_err(session)?)),
            None => Ok(None),
        }
    }

    async fn query_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, BrowserError> {
        let found = self
            .driver
            .find_all(By::Css(selector))
            .await
            .map_err(session)?;
        match found.into_iter().next() {
            Some(element) => element.attr(attribute).await.map_err(session),
            None => Ok(None),
        }
    }

    async fn content_prefix(&self, max_chars: usize) -> Result<String, BrowserError> {
        let source = self.driver.source().await.map_err(session)?;
        Ok(dom::char_prefix(&source, max_chars))
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.driver.quit().await.map_err(session)?;
        debug!("WebDriver session closed");
        Ok(())
    }
}
