//! # Profile Sweep
//!
//! Command-line entry point: resolves configuration and targets, acquires a
//! browser session, runs the batch and writes the results.
//!
//! ## Usage
//!
//! ```sh
//! profile_sweep -t profiles.txt -o profiles.csv --json-output report.json
//! ```

use chrono::Utc;
use clap::Parser;
use profile_sweep::browser::http::HttpBrowser;
use profile_sweep::cli::Cli;
use profile_sweep::config::{read_targets_file, Backend, SweepConfig};
use profile_sweep::models::{BatchResult, Target};
use profile_sweep::outputs::{csv, json};
use profile_sweep::pacing::Pacing;
use profile_sweep::sweep::{BlockDetector, Sweeper, TracingReporter};
use profile_sweep::utils::ensure_writable_parent;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("profile_sweep starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => match SweepConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Could not load configuration");
                return Err(e.into());
            }
        },
        None => SweepConfig::default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    let targets = resolve_targets(&args, &config)?;
    if targets.is_empty() {
        error!("No targets given (pass addresses, --targets-file, or `targets` in the config)");
        return Err("no targets to visit".into());
    }
    info!(
        count = targets.len(),
        backend = ?config.browser.backend,
        attributes = ?config.attribute_names(),
        "Targets resolved"
    );

    // Early check: fail before visiting anything if results cannot be written
    for path in std::iter::once(&args.output).chain(args.json_output.as_ref()) {
        if let Err(e) = ensure_writable_parent(path).await {
            error!(
                path = %path.display(),
                error = %e,
                "Output location is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Run ----
    let sweeper = Sweeper::new(
        config.attributes.clone(),
        BlockDetector::new(config.block.signatures.clone(), config.block.prefix_chars),
        config.pacing,
    );
    let started_at = Utc::now();
    let batch = match config.browser.backend {
        Backend::Http => {
            let browser = HttpBrowser::launch(
                &config.browser.user_agent,
                Duration::from_secs(config.browser.timeout_secs),
            )?;
            sweeper.run(browser, &targets, &mut TracingReporter).await
        }
        Backend::Webdriver => run_webdriver(&sweeper, &config, &targets).await?,
    };
    let finished_at = Utc::now();

    // ---- Output ----
    let names = config.attribute_names();
    if let Err(e) = csv::write_csv(&batch, &names, &args.output).await {
        error!(path = %args.output.display(), error = %e, "Failed writing CSV");
        return Err(e.into());
    }
    if let Some(path) = &args.json_output {
        let report = json::RunReport::new(started_at, finished_at, &names, &batch);
        if let Err(e) = json::write_report(&report, path).await {
            error!(path = %path.display(), error = %e, "Failed writing JSON report");
        }
    }

    let summary = batch.summary();
    if summary.extracted == 0 {
        warn!(total = summary.total, "No profile data extracted");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        extracted = summary.extracted,
        blocked = summary.blocked,
        error = summary.error,
        output = %args.output.display(),
        "Execution complete"
    );

    Ok(())
}

/// Apply command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut SweepConfig, args: &Cli) {
    if let Some(backend) = args.backend {
        config.browser.backend = backend;
    }
    if let Some(url) = &args.webdriver_url {
        config.browser.webdriver_url = url.clone();
    }
    if args.headed {
        config.browser.headless = false;
    }
    if args.no_pacing {
        config.pacing = Pacing::none();
    }
}

/// Positional addresses win, then `--targets-file`, then the configuration file.
fn resolve_targets(args: &Cli, config: &SweepConfig) -> Result<Vec<Target>, Box<dyn Error>> {
    let addresses = if !args.targets.is_empty() {
        args.targets.clone()
    } else if let Some(path) = &args.targets_file {
        read_targets_file(path)?
    } else {
        config.targets.clone()
    };
    Ok(addresses.into_iter().map(Target::from).collect())
}

#[cfg(feature = "webdriver")]
async fn run_webdriver(
    sweeper: &Sweeper,
    config: &SweepConfig,
    targets: &[Target],
) -> Result<BatchResult, Box<dyn Error>> {
    use profile_sweep::browser::webdriver::{WebDriverBrowser, WebDriverOptions};

    let options = WebDriverOptions {
        server_url: config.browser.webdriver_url.clone(),
        headless: config.browser.headless,
        user_agent: config.browser.user_agent.clone(),
    };
    let browser = WebDriverBrowser::launch(&options).await?;
    Ok(sweeper.run(browser, targets, &mut TracingReporter).await)
}

#[cfg(not(feature = "webdriver"))]
async fn run_webdriver(
    _sweeper: &Sweeper,
    _config: &SweepConfig,
    _targets: &[Target],
) -> Result<BatchResult, Box<dyn Error>> {
    error!("WebDriver backend requested but this build lacks the `webdriver` feature");
    Err("rebuild with `--features webdriver` to use the WebDriver backend".into())
}
