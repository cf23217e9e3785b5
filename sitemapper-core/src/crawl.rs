use crate::map::{SiteMap, build_site_map};
use indicatif::{ProgressBar, ProgressStyle};
use sitemapper_scanner::config::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_REQUEST_INTERVAL, DEFAULT_TIMEOUT_SECS,
};
use sitemapper_scanner::{CrawlConfig, Crawler, ProgressCallback, ScanError};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub max_pages: usize,
    pub max_depth: usize,
    pub request_interval: Duration,
    pub timeout: Duration,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            request_interval: DEFAULT_REQUEST_INTERVAL,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            show_progress_bars: false,
        }
    }

    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new(self.url.clone())
            .with_max_pages(self.max_pages)
            .with_max_depth(self.max_depth)
            .with_request_interval(self.request_interval)
            .with_timeout(self.timeout)
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

fn progress_bar(max_pages: usize) -> ProgressBar {
    let pb = ProgressBar::new(max_pages as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style.progress_chars("=> "));
    pb.set_message("Starting crawl...");
    pb
}

/// Execute a crawl with the given options and aggregate the site map.
///
/// Fails only when the options do not describe a valid crawl; failures on
/// individual pages are forwarded to `progress_callback` as `[!]` messages.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<SiteMap, ScanError> {
    let config = options.to_config();
    let max_pages = config.max_pages;

    // Validates before any progress output appears.
    let crawler = Crawler::new(config)?;

    let progress_bar = options
        .show_progress_bars
        .then(|| Arc::new(progress_bar(max_pages)));

    let pb_clone = progress_bar.clone();
    let internal_progress_callback: ProgressCallback =
        Arc::new(move |fraction: f64, message: String| {
            if let Some(ref pb) = pb_clone {
                if message.starts_with("[!]") {
                    pb.println(&message);
                } else {
                    pb.set_position((fraction * max_pages as f64).round() as u64);
                    pb.set_message(message.clone());
                }
            }
            if let Some(ref callback) = progress_callback {
                callback(message);
            }
        });

    let state = crawler
        .with_progress_callback(internal_progress_callback)
        .crawl()
        .await?;

    let site_map = build_site_map(&state);
    info!(
        "Mapped {} pages on {} ({} words, {} internal links)",
        site_map.summary.total_pages,
        site_map.domain,
        site_map.summary.total_words,
        site_map.summary.total_links
    );

    if let Some(ref pb) = progress_bar {
        pb.set_position(site_map.summary.total_pages as u64);
        pb.finish_with_message(format!(
            "Crawl complete! {} pages mapped",
            site_map.summary.total_pages
        ));
    }

    Ok(site_map)
}
