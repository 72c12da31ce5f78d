//! Attribute extraction with layered fallback strategies.
//!
//! Profile markup drifts, so each attribute lists several selection rules.
//! They are tried in order and the first one yielding usable text wins. A
//! strategy that matches nothing, matches only whitespace, matches a rejected
//! phrase, or makes the browser report an error is simply a miss; when every
//! strategy misses the attribute is [`ExtractionOutcome::Unavailable`].

use crate::browser::Browser;
use crate::models::{AttributeSpec, ExtractionOutcome, Strategy, TRUNCATION_MARKER};
use tracing::{debug, trace};

/// Extract one attribute from the page currently loaded in `page`.
///
/// # Arguments
///
/// * `page` - Browser with the target already loaded; only queried
/// * `spec` - The attribute and its ordered strategies
///
/// # Returns
///
/// The first strategy's trimmed text that is non-blank and free of rejected
/// phrases, capped to `spec.max_chars`, or [`ExtractionOutcome::Unavailable`]
/// when every strategy misses. Never fails: browser errors count as misses.
pub async fn extract<B: Browser>(page: &B, spec: &AttributeSpec) -> ExtractionOutcome {
    for (rank, strategy) in spec.strategies.iter().enumerate() {
        let Some(raw) = attempt(page, strategy).await else {
            trace!(attribute = %spec.name, rank, %strategy, "Strategy missed");
            continue;
        };

        let text = raw.trim();
        if text.is_empty() {
            trace!(attribute = %spec.name, rank, %strategy, "Strategy matched blank text");
            continue;
        }
        if let Some(needle) = spec.reject_containing.iter().find(|n| text.contains(n.as_str())) {
            debug!(attribute = %spec.name, rank, %strategy, %needle, "Strategy matched rejected text");
            continue;
        }

        debug!(attribute = %spec.name, rank, %strategy, "Strategy hit");
        return ExtractionOutcome::Value(cap_length(text, spec.max_chars));
    }

    debug!(attribute = %spec.name, "No strategy produced a value");
    ExtractionOutcome::Unavailable
}

/// Run one strategy. Browser errors count as a miss.
async fn attempt<B: Browser>(page: &B, strategy: &Strategy) -> Option<String> {
    let result = match &strategy.attribute {
        Some(attr) => page.query_attribute(&strategy.selector, attr).await,
        None => page.query_text(&strategy.selector).await,
    };
    match result {
        Ok(found) => found,
        Err(e) => {
            debug!(%strategy, error = %e, "Strategy query failed");
            None
        }
    }
}

/// Cut `text` so the result, marker included, is at most `max_chars` characters.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(cap_length("Computer scientist", Some(10)), "Compute...");
/// assert_eq!(cap_length("short", Some(10)), "short");
/// ```
pub fn cap_length(text: &str, max_chars: Option<usize>) -> String {
    let Some(max) = max_chars else {
        return text.to_string();
    };
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut capped: String = text.chars().take(keep).collect();
    capped.push_str(TRUNCATION_MARKER);
    capped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::stub::StubBrowser;

    const PAGE: &str = r#"<html><head>
        <meta property="og:title" content="Grace Hopper - Rear Admiral">
        </head><body>
        <h1>   </h1>
        <h2>Sign in to view more</h2>
        <div class="name">Grace Hopper</div>
        <p class="bio">Computer scientist and naval officer</p>
        </body></html>"#;

    async fn loaded() -> StubBrowser {
        let mut browser = StubBrowser::new().page("https://example.com/in/grace", PAGE);
        browser.navigate("https://example.com/in/grace").await.unwrap();
        browser
    }

    #[tokio::test]
    async fn test_first_successful_strategy_wins() {
        let page = loaded().await;
        let spec = AttributeSpec::new(
            "name",
            vec![
                Strategy::text("h1"),
                Strategy::text(".missing"),
                Strategy::text(".name"),
                Strategy::attr("meta[property='og:title']", "content"),
            ],
        );

        assert_eq!(
            extract(&page, &spec).await,
            ExtractionOutcome::Value("Grace Hopper".to_string())
        );
    }

    #[tokio::test]
    async fn test_attribute_strategy_reads_element_attribute() {
        let page = loaded().await;
        let spec = AttributeSpec::new(
            "headline",
            vec![Strategy::attr("meta[property='og:title']", "content")],
        );

        assert_eq!(
            extract(&page, &spec).await.as_str(),
            "Grace Hopper - Rear Admiral"
        );
    }

    #[tokio::test]
    async fn test_rejected_text_falls_through_to_next_strategy() {
        let page = loaded().await;
        let spec = AttributeSpec::new(
            "headline",
            vec![Strategy::text("h2"), Strategy::text("p.bio")],
        )
        .rejecting("Sign in");

        assert_eq!(
            extract(&page, &spec).await.as_str(),
            "Computer scientist and naval officer"
        );
    }

    #[tokio::test]
    async fn test_all_strategies_missing_is_unavailable() {
        let page = loaded().await;
        let spec = AttributeSpec::new(
            "location",
            vec![Strategy::text("span.text-body-small"), Strategy::text("h1")],
        );

        assert_eq!(extract(&page, &spec).await, ExtractionOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_invalid_selector_is_a_miss_not_a_fault() {
        let page = loaded().await;
        let spec = AttributeSpec::new(
            "name",
            vec![Strategy::text("div[["), Strategy::text(".name")],
        );

        assert_eq!(extract(&page, &spec).await.as_str(), "Grace Hopper");
    }

    #[tokio::test]
    async fn test_long_value_is_capped_with_marker() {
        let page = loaded().await;
        let spec = AttributeSpec::new("about", vec![Strategy::text("p.bio")]).with_max_chars(20);

        let outcome = extract(&page, &spec).await;
        assert_eq!(outcome.as_str(), "Computer scientis...");
        assert_eq!(outcome.as_str().chars().count(), 20);
    }

    #[test]
    fn test_cap_length_leaves_short_values_alone() {
        assert_eq!(cap_length("short", Some(200)), "short");
        assert_eq!(cap_length("exactly", Some(7)), "exactly");
        assert_eq!(cap_length("anything", None), "anything");
    }

    #[test]
    fn test_cap_length_matches_about_section_rule() {
        let about = "x".repeat(201);
        let capped = cap_length(&about, Some(200));
        assert_eq!(capped.len(), 200);
        assert!(capped.starts_with(&"x".repeat(197)));
        assert!(capped.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_cap_length_counts_characters() {
        assert_eq!(cap_length("ééééé", Some(4)), "é...");
    }
}
