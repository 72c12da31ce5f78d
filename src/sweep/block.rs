//! Content-wall detection.
//!
//! Login and content walls announce themselves near the top of the rendered
//! markup. Only a bounded prefix of the page is inspected; later text (a bio
//! quoting "Sign in", say) must never trigger a block.

use crate::browser::{Browser, BrowserError};

/// Case-sensitive wall signatures matched within the first `prefix_chars`
/// characters of the page source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDetector {
    signatures: Vec<String>,
    prefix_chars: usize,
}

impl BlockDetector {
    /// Create a detector.
    ///
    /// # Arguments
    ///
    /// * `signatures` - Case-sensitive substrings; any one marks a wall
    /// * `prefix_chars` - How many leading characters of the page source to inspect
    pub fn new(signatures: Vec<String>, prefix_chars: usize) -> Self {
        Self {
            signatures,
            prefix_chars,
        }
    }

    /// Whether the page currently loaded in `page` shows a wall.
    ///
    /// # Errors
    ///
    /// Propagates the browser's error when the page source cannot be read.
    /// An unreadable page is never reported as "not blocked".
    pub async fn is_blocked<B: Browser>(&self, page: &B) -> Result<bool, BrowserError> {
        Ok(self.detect(page).await?.is_some())
    }

    /// The wall signature shown by the page currently loaded in `page`, if any.
    ///
    /// # Returns
    ///
    /// The first configured signature found in the page's first
    /// `prefix_chars` characters, or `None`.
    ///
    /// # Errors
    ///
    /// Same as [`BlockDetector::is_blocked`].
    pub async fn detect<B: Browser>(&self, page: &B) -> Result<Option<String>, BrowserError> {
        let prefix = page.content_prefix(self.prefix_chars).await?;
        Ok(self.matched(&prefix).map(str::to_string))
    }

    /// First signature found in the budgeted prefix of `content`.
    pub fn matched(&self, content: &str) -> Option<&str> {
        let end = content
            .char_indices()
            .nth(self.prefix_chars)
            .map_or(content.len(), |(i, _)| i);
        let window = &content[..end];
        self.signatures
            .iter()
            .find(|s| window.contains(s.as_str()))
            .map(String::as_str)
    }
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::new(vec!["Sign in".to_string()], 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::stub::StubBrowser;

    #[test]
    fn test_signature_inside_prefix_matches() {
        let detector = BlockDetector::default();
        let page = format!("<html><title>{}</title>", "Sign in | Network");
        assert_eq!(detector.matched(&page), Some("Sign in"));
    }

    #[test]
    fn test_signature_beyond_prefix_is_ignored() {
        let detector = BlockDetector::default();
        let page = format!("<html>{}<p>Sign in</p>", "x".repeat(600));
        assert_eq!(detector.matched(&page), None);
    }

    #[test]
    fn test_signature_straddling_the_budget_is_ignored() {
        let detector = BlockDetector::new(vec!["Sign in".to_string()], 10);
        assert_eq!(detector.matched("abcdeSign in"), None);
        assert_eq!(detector.matched("abcSign in"), Some("Sign in"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let detector = BlockDetector::default();
        assert_eq!(detector.matched("<html>sign in</html>"), None);
    }

    #[test]
    fn test_any_signature_can_match() {
        let detector = BlockDetector::new(
            vec!["Sign in".to_string(), "Join now".to_string()],
            500,
        );
        assert_eq!(detector.matched("<p>Join now to see</p>"), Some("Join now"));
    }

    #[tokio::test]
    async fn test_is_blocked_reads_page_prefix() {
        let mut browser = StubBrowser::new()
            .page("https://example.com/wall", "<h1>Sign in</h1>")
            .page("https://example.com/open", "<h1>Ada</h1>");
        let detector = BlockDetector::default();

        browser.navigate("https://example.com/wall").await.unwrap();
        assert!(detector.is_blocked(&browser).await.unwrap());

        browser.navigate("https://example.com/open").await.unwrap();
        assert!(!detector.is_blocked(&browser).await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_page_is_an_error() {
        let browser = StubBrowser::new();
        assert!(BlockDetector::default().is_blocked(&browser).await.is_err());
    }
}
