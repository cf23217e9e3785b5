use crate::error::{Result, ScanError};
use crate::normalize::normalize_url;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 15;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Settings for a single crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed_url: String,
    /// Maximum number of successfully extracted pages.
    pub max_pages: usize,
    /// Pages at this many hops from the seed or more are never fetched.
    pub max_depth: usize,
    /// Pause after every processed target.
    pub request_interval: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            request_interval: DEFAULT_REQUEST_INTERVAL,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("SiteMapper/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The seed after normalization; the first queue entry.
    ///
    /// Goes through `Url` serialization so the key matches discovered links:
    /// lowercase scheme and host, no default port.
    pub fn normalized_seed(&self) -> String {
        let seed = normalize_url(self.seed_url.trim());
        match Url::parse(&seed) {
            Ok(parsed) => normalize_url(parsed.as_str()),
            Err(_) => seed,
        }
    }

    /// Checks the settings and returns the parsed, normalized seed.
    pub fn validate(&self) -> Result<Url> {
        if self.max_pages == 0 {
            return Err(ScanError::InvalidConfig(
                "max pages must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ScanError::InvalidConfig(
                "max depth must be at least 1".to_string(),
            ));
        }

        let seed = self.normalized_seed();
        let parsed = Url::parse(&seed)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::InvalidConfig(format!(
                "seed URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(ScanError::InvalidConfig(format!(
                "seed URL has no host: {}",
                seed
            )));
        }

        Ok(parsed)
    }
}
