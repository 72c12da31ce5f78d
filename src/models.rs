//! Data models shared by the extraction engine and its collaborators.
//!
//! - [`Target`]: one page address to visit
//! - [`AttributeSpec`] / [`Strategy`]: what to extract and how to look for it
//! - [`ExtractionOutcome`]: one attribute's value, or the [`UNAVAILABLE`] sentinel
//! - [`VisitResult`]: everything one visit produced
//! - [`BatchResult`]: one `VisitResult` per input target, in input order
//!
//! `VisitResult` is built only by the visitor (its constructors are crate
//! private) and exposes read-only accessors, so nothing downstream can mutate
//! a finished visit.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Value written in place of an attribute no strategy could extract.
pub const UNAVAILABLE: &str = "N/A";

/// Marker appended to a value cut down to its attribute's `max_chars`.
pub const TRUNCATION_MARKER: &str = "...";

/// An opaque page address, visited in the order supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Wrap an address. No validation happens here; a malformed address
    /// surfaces as a navigation error during the visit.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Target {
    fn from(address: String) -> Self {
        Self(address)
    }
}

/// One selection rule for locating an attribute on a page.
///
/// Without `attribute` the rule reads the text of the first element matching
/// `selector`; with it, the value of that element attribute instead
/// (e.g. `meta[property='og:title']` + `content`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Strategy {
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Strategy {
    /// Read the text of the first element matching `selector`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let s = Strategy::text("h1");
    /// assert_eq!(s.to_string(), "h1");
    /// ```
    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attribute: None,
        }
    }

    /// Read `attribute` from the first element matching `selector`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let s = Strategy::attr("meta[property='og:title']", "content");
    /// assert_eq!(s.to_string(), "meta[property='og:title']@content");
    /// ```
    pub fn attr(selector: &str, attribute: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attribute: Some(attribute.to_string()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "{}@{}", self.selector, attr),
            None => f.write_str(&self.selector),
        }
    }
}

/// A named attribute and the strategies tried for it, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttributeSpec {
    pub name: String,
    pub strategies: Vec<Strategy>,
    /// Upper bound on the stored value's length in characters, marker included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
    /// A strategy whose text contains any of these counts as failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reject_containing: Vec<String>,
}

impl AttributeSpec {
    /// An uncapped attribute with no rejected phrases.
    ///
    /// # Arguments
    ///
    /// * `name` - Output column and result key; unique within a run
    /// * `strategies` - Tried in order, first usable text wins
    pub fn new(name: &str, strategies: Vec<Strategy>) -> Self {
        Self {
            name: name.to_string(),
            strategies,
            max_chars: None,
            reject_containing: Vec::new(),
        }
    }

    /// Cap stored values at `max_chars` characters, the `...` marker included.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Treat any strategy text containing `needle` as a miss.
    pub fn rejecting(mut self, needle: &str) -> Self {
        self.reject_containing.push(needle.to_string());
        self
    }
}

/// Result of extracting one attribute during one visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Trimmed, non-empty, possibly truncated text.
    Value(String),
    /// Every strategy missed. Written as [`UNAVAILABLE`].
    Unavailable,
}

impl ExtractionOutcome {
    /// The value, or [`UNAVAILABLE`] for a miss.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractionOutcome::Value(v) => v,
            ExtractionOutcome::Unavailable => UNAVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ExtractionOutcome::Value(_))
    }
}

impl fmt::Display for ExtractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExtractionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How a visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    /// The page loaded without a wall. Individual attributes may still be
    /// unavailable.
    Extracted,
    /// A content wall was seen, on load or after extraction.
    Blocked,
    /// Navigation, a wall check or the browser itself failed.
    Error,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Extracted => "extracted",
            VisitStatus::Blocked => "blocked",
            VisitStatus::Error => "error",
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute outcomes keyed by name, kept in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes(Vec<(String, ExtractionOutcome)>);

impl Attributes {
    /// Every name in `specs` mapped to the sentinel.
    pub(crate) fn unavailable(specs: &[AttributeSpec]) -> Self {
        Self(
            specs
                .iter()
                .map(|s| (s.name.clone(), ExtractionOutcome::Unavailable))
                .collect(),
        )
    }

    pub(crate) fn from_pairs(pairs: Vec<(String, ExtractionOutcome)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, name: &str) -> Option<&ExtractionOutcome> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractionOutcome)> {
        self.0.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of attributes holding a real value.
    pub fn available_count(&self) -> usize {
        self.0.iter().filter(|(_, o)| o.is_available()).count()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, outcome) in &self.0 {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}

/// Everything one visit produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitResult {
    target: Target,
    status: VisitStatus,
    attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<String>,
}

impl VisitResult {
    pub(crate) fn extracted(target: Target, attributes: Attributes) -> Self {
        Self {
            target,
            status: VisitStatus::Extracted,
            attributes,
            diagnostic: None,
        }
    }

    pub(crate) fn blocked(target: Target, specs: &[AttributeSpec], diagnostic: String) -> Self {
        Self {
            target,
            status: VisitStatus::Blocked,
            attributes: Attributes::unavailable(specs),
            diagnostic: Some(diagnostic),
        }
    }

    pub(crate) fn error(target: Target, specs: &[AttributeSpec], diagnostic: String) -> Self {
        Self {
            target,
            status: VisitStatus::Error,
            attributes: Attributes::unavailable(specs),
            diagnostic: Some(diagnostic),
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn status(&self) -> VisitStatus {
        self.status
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Outcome for `name`, or the sentinel when `name` is not configured.
    pub fn attribute(&self, name: &str) -> &ExtractionOutcome {
        self.attributes
            .get(name)
            .unwrap_or(&ExtractionOutcome::Unavailable)
    }

    /// Why a visit was blocked or failed; `None` for `extracted`.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }
}

/// Per-status counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub extracted: usize,
    pub blocked: usize,
    pub error: usize,
}

/// One [`VisitResult`] per input target, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BatchResult {
    visits: Vec<VisitResult>,
}

impl BatchResult {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            visits: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, visit: VisitResult) {
        self.visits.push(visit);
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VisitResult> {
        self.visits.iter()
    }

    pub fn visits(&self) -> &[VisitResult] {
        &self.visits
    }

    /// Count the visits per status.
    pub fn summary(&self) -> BatchSummary {
        self.visits
            .iter()
            .fold(BatchSummary::default(), |mut acc, v| {
                acc.total += 1;
                match v.status {
                    VisitStatus::Extracted => acc.extracted += 1,
                    VisitStatus::Blocked => acc.blocked += 1,
                    VisitStatus::Error => acc.error += 1,
                }
                acc
            })
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a VisitResult;
    type IntoIter = std::slice::Iter<'a, VisitResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.visits.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<AttributeSpec> {
        vec![
            AttributeSpec::new("name", vec![Strategy::text("h1")]),
            AttributeSpec::new("headline", vec![Strategy::text("h2")]),
        ]
    }

    #[test]
    fn test_blocked_result_has_every_attribute_as_sentinel() {
        let result = VisitResult::blocked(
            Target::from("https://example.com/in/a"),
            &specs(),
            "wall".to_string(),
        );

        assert_eq!(result.status(), VisitStatus::Blocked);
        assert_eq!(result.attributes().len(), 2);
        assert_eq!(result.attribute("name"), &ExtractionOutcome::Unavailable);
        assert_eq!(result.attribute("headline").as_str(), UNAVAILABLE);
        assert_eq!(result.diagnostic(), Some("wall"));
    }

    #[test]
    fn test_attribute_lookup_of_unknown_name_is_sentinel() {
        let result = VisitResult::extracted(Target::from("a"), Attributes::unavailable(&specs()));
        assert_eq!(result.attribute("nickname"), &ExtractionOutcome::Unavailable);
    }

    #[test]
    fn test_visit_result_serialization_keeps_attribute_order() {
        let attributes = Attributes::from_pairs(vec![
            ("name".to_string(), ExtractionOutcome::Value("Ada".to_string())),
            ("headline".to_string(), ExtractionOutcome::Unavailable),
        ]);
        let result = VisitResult::extracted(Target::from("https://example.com/in/ada"), attributes);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"target":"https://example.com/in/ada","status":"extracted","attributes":{"name":"Ada","headline":"N/A"}}"#
        );
    }

    #[test]
    fn test_strategy_deserializes_with_and_without_attribute() {
        let yaml = r#"
- selector: h1
- selector: "meta[property='og:title']"
  attribute: content
"#;
        let strategies: Vec<Strategy> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(strategies[0], Strategy::text("h1"));
        assert_eq!(strategies[1], Strategy::attr("meta[property='og:title']", "content"));
        assert_eq!(strategies[1].to_string(), "meta[property='og:title']@content");
    }

    #[test]
    fn test_batch_summary_counts_statuses() {
        let mut batch = BatchResult::with_capacity(3);
        batch.push(VisitResult::extracted(Target::from("a"), Attributes::unavailable(&specs())));
        batch.push(VisitResult::blocked(Target::from("b"), &specs(), "wall".into()));
        batch.push(VisitResult::error(Target::from("c"), &specs(), "boom".into()));

        let summary = batch.summary();
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                extracted: 1,
                blocked: 1,
                error: 1
            }
        );
    }
}
