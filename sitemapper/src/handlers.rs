use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use sitemapper_core::SiteMap;
use sitemapper_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
use sitemapper_core::report::{
    ReportFormat, generate_csv_report, generate_json_report, generate_text_report, save_report,
};
use sitemapper_scanner::normalize::normalize_url;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

// Helper functions for the map handler

/// Parse the seed argument, defaulting to https when no scheme is given
pub fn parse_seed_url(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("A URL is required".to_string());
    }

    let normalized = normalize_url(trimmed);
    match Url::parse(&normalized) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => Err(format!(
            "Unsupported scheme '{}' in {}; only http and https sites can be mapped",
            url.scheme(),
            trimmed
        )),
        Ok(url) if url.host_str().is_none() => Err(format!("No host in URL '{}'", trimmed)),
        Ok(url) => Ok(normalize_url(url.as_str())),
        Err(e) => Err(format!("Invalid URL '{}': {}", trimmed, e)),
    }
}

/// Build crawl options from raw argument values and reject bad budgets up front
pub fn build_crawl_options(
    url: &str,
    max_pages: usize,
    max_depth: usize,
    delay_ms: u64,
    timeout_secs: u64,
) -> Result<CrawlOptions, String> {
    let mut options = CrawlOptions::new(parse_seed_url(url)?);
    options.max_pages = max_pages;
    options.max_depth = max_depth;
    options.request_interval = Duration::from_millis(delay_ms);
    options.timeout = Duration::from_secs(timeout_secs);

    if timeout_secs == 0 {
        return Err("Timeout must be at least 1 second".to_string());
    }
    options
        .to_config()
        .validate()
        .map_err(|e| e.to_string())?;

    Ok(options)
}

pub fn render_report(format: ReportFormat, site_map: &SiteMap) -> Result<String> {
    let report = match format {
        ReportFormat::Text => generate_text_report(site_map),
        ReportFormat::Json => {
            generate_json_report(site_map).context("Failed to serialize JSON report")?
        }
        ReportFormat::Csv => generate_csv_report(site_map).context("Failed to write CSV report")?,
    };
    Ok(report)
}

/// Expand a leading `~` in a user supplied output path
pub fn resolve_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Save the report to `output`, or print it when no path is given.
///
/// Returns the path actually written.
pub fn write_report(report: &str, output: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(output) = output else {
        print!("{}", report);
        return Ok(None);
    };

    let path = resolve_output_path(output);
    save_report(report, &path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    debug!("Report written to {}", path.display());
    Ok(Some(path))
}

pub async fn handle_map(sub_matches: &ArgMatches, quiet: bool) {
    // Logs go to stderr so a report on stdout stays clean
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let url = sub_matches.get_one::<String>("url").unwrap();
    let max_pages = *sub_matches.get_one::<usize>("max-pages").unwrap_or(&15);
    let max_depth = *sub_matches.get_one::<usize>("max-depth").unwrap_or(&3);
    let delay_ms = *sub_matches.get_one::<u64>("delay-ms").unwrap_or(&500);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&30);
    let output = sub_matches.get_one::<PathBuf>("output");
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let mut options =
        match build_crawl_options(url, max_pages, max_depth, delay_ms, timeout_secs) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("{} {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        };
    options.show_progress_bars = !quiet;

    if !quiet {
        eprintln!(
            "\n{} Mapping {}",
            "→".blue(),
            options.url.bright_white().bold()
        );
        eprintln!(
            "Max pages: {}  Max depth: {}  Delay: {}ms\n",
            max_pages.to_string().cyan(),
            max_depth.to_string().cyan(),
            delay_ms.to_string().cyan()
        );
    }

    // Without a progress bar, failures are still worth surfacing
    let progress_callback: Option<CrawlProgressCallback> = quiet.then(|| {
        Arc::new(|msg: String| {
            if msg.starts_with("[!]") {
                eprintln!("{}", msg.yellow());
            }
        }) as CrawlProgressCallback
    });

    let site_map = match execute_crawl(options, progress_callback).await {
        Ok(site_map) => site_map,
        Err(e) => {
            eprintln!("{} Crawl failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if site_map.pages.is_empty() {
        eprintln!(
            "{} No pages could be extracted from {}",
            "⚠".yellow().bold(),
            site_map.domain
        );
    } else if !quiet {
        eprintln!(
            "\n{} Mapped {} pages on {}\n",
            "✓".green().bold(),
            site_map.summary.total_pages.to_string().bright_white(),
            site_map.domain.bright_white()
        );
    }

    let report = match render_report(format, &site_map) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    match write_report(&report, output.map(PathBuf::as_path)) {
        Ok(Some(path)) => eprintln!(
            "{} Report saved to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        ),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
