use crate::config::CrawlConfig;
use crate::error::Result;
use crate::extract::extract_page;
use crate::fetcher::{FetchOutcome, Fetcher};
use crate::normalize::{base_domain, host_key, is_internal};
use crate::page::PageRecord;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Receives `(fraction_complete, status_message)` once per processed target,
/// and once more with a `[!]` message when that target fails to fetch.
pub type ProgressCallback = Arc<dyn Fn(f64, String) + Send + Sync>;

/// Path suffixes that are never fetched.
pub const SKIPPED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".jpg", ".png", ".gif", ".css", ".js"];

/// A queued unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: String,
    pub depth: usize,
    pub parent_url: Option<String>,
}

/// Why a dequeued target was dropped without being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRejection {
    UnsupportedScheme,
    External,
    TooDeep,
    SkippedExtension,
    AlreadyVisited,
}

impl fmt::Display for ScopeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ScopeRejection::UnsupportedScheme => "not http(s)",
            ScopeRejection::External => "outside the seed domain",
            ScopeRejection::TooDeep => "beyond max depth",
            ScopeRejection::SkippedExtension => "skipped file type",
            ScopeRejection::AlreadyVisited => "already visited",
        };
        f.write_str(reason)
    }
}

/// Everything one crawl run accumulates. Owned by a single `crawl` call.
#[derive(Debug, Clone)]
pub struct CrawlState {
    pub seed_url: String,
    /// Host (with explicit port) of the seed URL.
    pub seed_host: String,
    pub queue: VecDeque<CrawlTarget>,
    /// Normalized URLs that have been taken off the queue and processed.
    /// Only ever grows.
    pub visited: HashSet<String>,
    /// Extracted pages in crawl order.
    pub pages: Vec<PageRecord>,
    /// Parent URL to children, in discovery order.
    pub site_structure: BTreeMap<String, Vec<String>>,
}

impl CrawlState {
    pub fn new(seed_url: String, seed_host: String) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(CrawlTarget {
            url: seed_url.clone(),
            depth: 0,
            parent_url: None,
        });

        Self {
            seed_url,
            seed_host,
            queue,
            visited: HashSet::new(),
            pages: Vec::new(),
            site_structure: BTreeMap::new(),
        }
    }

    /// The seed host without a leading `www.`.
    pub fn domain(&self) -> &str {
        base_domain(&self.seed_host)
    }

    /// Scope predicate applied when a link is discovered and again when it
    /// is dequeued. Enqueueing is optimistic: a target that passed at
    /// discovery may still be rejected later, e.g. once it has been visited
    /// through another parent.
    pub fn scope_check(
        &self,
        url: &str,
        depth: usize,
        max_depth: usize,
    ) -> std::result::Result<(), ScopeRejection> {
        let Ok(parsed) = Url::parse(url) else {
            return Err(ScopeRejection::UnsupportedScheme);
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScopeRejection::UnsupportedScheme);
        }
        if !is_internal(url, &self.seed_host) {
            return Err(ScopeRejection::External);
        }
        if depth >= max_depth {
            return Err(ScopeRejection::TooDeep);
        }
        let path = parsed.path().to_lowercase();
        if SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return Err(ScopeRejection::SkippedExtension);
        }
        if self.visited.contains(url) {
            return Err(ScopeRejection::AlreadyVisited);
        }
        Ok(())
    }

    fn record_page(&mut self, page: PageRecord, target: &CrawlTarget, max_depth: usize) {
        if let Some(ref parent) = target.parent_url {
            self.site_structure
                .entry(parent.clone())
                .or_default()
                .push(page.url.clone());
        }

        let child_depth = target.depth + 1;
        let mut queued = 0;
        for link in &page.internal_links {
            match self.scope_check(&link.url, child_depth, max_depth) {
                Ok(()) => {
                    self.queue.push_back(CrawlTarget {
                        url: link.url.clone(),
                        depth: child_depth,
                        parent_url: Some(page.url.clone()),
                    });
                    queued += 1;
                }
                Err(reason) => debug!("  -> Not queuing {}: {}", link.url, reason),
            }
        }
        debug!("Queued {} links from {}", queued, page.url);

        self.pages.push(page);
    }
}

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Fetcher,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    /// Validates the configuration and builds the HTTP client.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = Fetcher::new(&config)?;

        Ok(Self {
            config,
            fetcher,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Breadth-first crawl from the seed until the queue is empty or the page
    /// budget is spent. Per-page failures are logged and skipped; only an
    /// invalid seed makes this return an error.
    pub async fn crawl(&self) -> Result<CrawlState> {
        let seed = self.config.validate()?;
        let seed_host = host_key(&seed).unwrap_or_default();
        let seed_url = self.config.normalized_seed();
        let max_pages = self.config.max_pages;
        let max_depth = self.config.max_depth;

        info!(
            "Starting crawl of {} (max pages {}, max depth {})",
            seed_url, max_pages, max_depth
        );

        let mut state = CrawlState::new(seed_url, seed_host);

        while state.pages.len() < max_pages {
            let Some(target) = state.queue.pop_front() else {
                break;
            };

            if let Err(reason) = state.scope_check(&target.url, target.depth, max_depth) {
                debug!("Skipping {} (depth {}): {}", target.url, target.depth, reason);
                continue;
            }

            let crawled = state.pages.len();
            let fraction = crawled as f64 / max_pages as f64;
            self.report(
                fraction,
                format!("Crawling ({}/{}): {}", crawled + 1, max_pages, target.url),
            );

            state.visited.insert(target.url.clone());

            match self.fetcher.fetch(&target.url).await {
                Ok(FetchOutcome::Html(body)) => {
                    let parent = target.parent_url.as_deref().unwrap_or("");
                    let page = extract_page(&body, &target.url, target.depth, parent);
                    state.record_page(page, &target, max_depth);
                }
                Ok(FetchOutcome::NotHtml { content_type }) => {
                    debug!("Not HTML, skipping {} ({:?})", target.url, content_type);
                }
                Err(e) => {
                    warn!("Crawl error for {}: {}", target.url, e);
                    self.report(fraction, format!("[!] Failed to crawl {}: {}", target.url, e));
                }
            }

            if !self.config.request_interval.is_zero() {
                tokio::time::sleep(self.config.request_interval).await;
            }
        }

        info!(
            "Crawl complete. Extracted {} pages, visited {} URLs",
            state.pages.len(),
            state.visited.len()
        );
        Ok(state)
    }

    fn report(&self, fraction: f64, message: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(fraction, message);
        }
    }
}
