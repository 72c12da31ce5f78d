//! Run configuration loaded from YAML.
//!
//! Every section is optional; anything left out keeps the defaults below,
//! which mirror the public-profile layout this tool was written for.
//!
//! ```yaml
//! targets:
//!   - https://www.linkedin.com/in/williamhgates
//! attributes:
//!   - name: name
//!     strategies:
//!       - selector: h1
//!       - selector: "meta[property='og:title']"
//!         attribute: content
//! block:
//!   signatures: ["Sign in"]
//!   prefix_chars: 500
//! pacing:
//!   between_visits: { min_ms: 5000, max_ms: 10000 }
//! browser:
//!   backend: http
//! ```

use crate::models::{AttributeSpec, Strategy, TRUNCATION_MARKER};
use crate::outputs::csv::{STATUS_COLUMN, URL_COLUMN};
use crate::pacing::Pacing;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which [`crate::browser::Browser`] implementation drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Http,
    Webdriver,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Case-sensitive substrings that mark a content wall.
    pub signatures: Vec<String>,
    /// How many leading characters of the page source are inspected.
    pub prefix_chars: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            signatures: vec!["Sign in".to_string()],
            prefix_chars: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub backend: Backend,
    pub user_agent: String,
    /// Per-request timeout for the HTTP backend.
    pub timeout_secs: u64,
    pub webdriver_url: String,
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Http,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    pub targets: Vec<String>,
    pub attributes: Vec<AttributeSpec>,
    pub block: BlockConfig,
    pub pacing: Pacing,
    pub browser: BrowserConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            attributes: default_attributes(),
            block: BlockConfig::default(),
            pacing: Pacing::default(),
            browser: BrowserConfig::default(),
        }
    }
}

/// `name`, `headline`, `location` and `about`, primary selectors first and
/// metadata fallbacks after.
pub fn default_attributes() -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::new(
            "name",
            vec![
                Strategy::text("h1"),
                Strategy::attr("meta[property='og:title']", "content"),
            ],
        ),
        AttributeSpec::new(
            "headline",
            vec![
                Strategy::text("h2"),
                Strategy::text(".top-card-layout__headline"),
            ],
        )
        .rejecting("Sign in"),
        AttributeSpec::new(
            "location",
            vec![
                Strategy::text("span.text-body-small"),
                Strategy::text(".top-card__subline-item"),
            ],
        ),
        AttributeSpec::new(
            "about",
            vec![
                Strategy::text("section[id*='about'] .pv-text-entity"),
                Strategy::text("section.summary p"),
                Strategy::attr("meta[name='description']", "content"),
            ],
        )
        .with_max_chars(200),
    ]
}

impl SweepConfig {
    /// Read and validate a YAML configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - YAML file; missing sections keep their defaults
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Io`] if the file cannot be read
    /// - [`ConfigError::Parse`] if it is not valid YAML for this schema
    /// - [`ConfigError::Invalid`] if [`SweepConfig::validate`] rejects it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: SweepConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.validate()?;
        info!(
            path = %path.display(),
            attributes = config.attributes.len(),
            targets = config.targets.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// Attribute names must be non-empty, unique and distinct from the fixed
    /// `url` and `status` output columns. Every attribute needs at least one
    /// strategy, caps must leave room for the truncation marker, wall
    /// signatures must be non-empty, and pacing ranges must not be inverted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attributes.is_empty() {
            return Err(ConfigError::Invalid("no attributes configured".into()));
        }
        for spec in &self.attributes {
            if spec.name.trim().is_empty() {
                return Err(ConfigError::Invalid("attribute with an empty name".into()));
            }
            if spec.name == URL_COLUMN || spec.name == STATUS_COLUMN {
                return Err(ConfigError::Invalid(format!(
                    "attribute name {} clashes with a fixed output column",
                    spec.name
                )));
            }
            if spec.strategies.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "attribute {} has no strategies",
                    spec.name
                )));
            }
            if let Some(s) = spec.strategies.iter().find(|s| s.selector.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "attribute {} has an empty selector ({s})",
                    spec.name
                )));
            }
            if let Some(max) = spec.max_chars {
                if max <= TRUNCATION_MARKER.chars().count() {
                    return Err(ConfigError::Invalid(format!(
                        "attribute {} max_chars {max} leaves no room for the truncation marker",
                        spec.name
                    )));
                }
            }
        }
        let duplicates = self
            .attributes
            .iter()
            .map(|s| s.name.as_str())
            .duplicates()
            .collect::<Vec<_>>();
        if !duplicates.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "duplicate attribute names: {}",
                duplicates.join(", ")
            )));
        }

        if self.block.signatures.is_empty() {
            return Err(ConfigError::Invalid("no wall signatures configured".into()));
        }
        if self.block.signatures.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::Invalid("empty wall signature would match every page".into()));
        }
        if self.block.prefix_chars == 0 {
            return Err(ConfigError::Invalid("block.prefix_chars must be positive".into()));
        }
        for (name, range) in self.pacing.ranges() {
            if !range.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "pacing.{name}: min_ms {} exceeds max_ms {}",
                    range.min_ms, range.max_ms
                )));
            }
        }
        if self.browser.timeout_secs == 0 {
            return Err(ConfigError::Invalid("browser.timeout_secs must be positive".into()));
        }
        debug!("Configuration valid");
        Ok(())
    }

    /// Attribute names in configuration order, i.e. the CSV column order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Addresses from a text file, one per line. Blank lines and `#` comments are skipped.
pub fn read_targets_file(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_targets(&raw))
}

fn parse_targets(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
