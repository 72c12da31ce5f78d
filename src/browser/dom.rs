//! Selector queries over static markup, shared by the HTTP backend and the
//! test stub.

use super::BrowserError;
use scraper::{ElementRef, Html, Selector};

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|e| BrowserError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Rendered text of an element with whitespace runs collapsed to one space.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element in `html` matching `selector`.
///
/// # Returns
///
/// `None` when nothing matches. Whitespace inside the element is collapsed
/// to single spaces, so a matching but empty element yields `Some("")`.
///
/// # Errors
///
/// Returns [`BrowserError::Selector`] if `selector` does not parse.
pub fn first_text(html: &str, selector: &str) -> Result<Option<String>, BrowserError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().map(element_text))
}

/// Value of `attribute` on the first element in `html` matching `selector`.
///
/// # Errors
///
/// Returns [`BrowserError::Selector`] if `selector` does not parse.
pub fn first_attribute(
    html: &str,
    selector: &str,
    attribute: &str,
) -> Result<Option<String>, BrowserError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attribute))
        .map(str::to_string))
}

/// First `max_chars` characters of `source`.
pub fn char_prefix(source: &str, max_chars: usize) -> String {
    source.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <meta property="og:title" content="Ada Lovelace | Analyst">
        </head><body>
        <h1>
            Ada
            Lovelace
        </h1>
        <h1>Second heading</h1>
        </body></html>"#;

    #[test]
    fn test_first_text_collapses_whitespace_and_takes_first_match() {
        assert_eq!(first_text(PAGE, "h1").unwrap(), Some("Ada Lovelace".to_string()));
    }

    #[test]
    fn test_first_text_missing_element_is_none() {
        assert_eq!(first_text(PAGE, "h2").unwrap(), None);
    }

    #[test]
    fn test_first_attribute_reads_value() {
        assert_eq!(
            first_attribute(PAGE, "meta[property='og:title']", "content").unwrap(),
            Some("Ada Lovelace | Analyst".to_string())
        );
        assert_eq!(first_attribute(PAGE, "h1", "class").unwrap(), None);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let err = first_text(PAGE, "h1[").unwrap_err();
        assert!(matches!(err, BrowserError::Selector { .. }));
    }

    #[test]
    fn test_char_prefix_counts_characters_not_bytes() {
        assert_eq!(char_prefix("héllo", 2), "hé");
        assert_eq!(char_prefix("abc", 10), "abc");
    }
}
