//! Command-line interface definitions for Profile Sweep.
//!
//! Flags override values from the optional YAML configuration file, which in
//! turn overrides the built-in defaults.

use crate::config::Backend;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Profile Sweep application.
///
/// # Examples
///
/// ```sh
/// # Visit two profiles with the default attribute set
/// profile_sweep https://www.linkedin.com/in/williamhgates https://www.linkedin.com/in/naval
///
/// # Targets from a file, custom config, JSON report alongside the CSV
/// profile_sweep -t profiles.txt -c sweep.yaml --json-output report.json
///
/// # Drive Chrome through a local chromedriver
/// profile_sweep -t profiles.txt --backend webdriver --webdriver-url http://localhost:9515
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Profile addresses to visit, in order
    pub targets: Vec<String>,

    /// File with one profile address per line (used when no addresses are given)
    #[arg(short, long)]
    pub targets_file: Option<PathBuf>,

    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "PROFILE_SWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where to write the CSV results
    #[arg(short, long, default_value = "profiles.csv")]
    pub output: PathBuf,

    /// Also write a JSON run report (statuses, diagnostics, timestamps)
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Browser backend; overrides the configuration file
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// WebDriver server URL; overrides the configuration file
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Show the browser window (WebDriver backend only)
    #[arg(long)]
    pub headed: bool,

    /// Disable every randomized wait
    #[arg(long)]
    pub no_pacing: bool,
}
