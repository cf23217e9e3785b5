use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Instant;
use tracing::debug;

const MAX_REDIRECTS: usize = 10;

/// What a successful GET produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Html(String),
    /// The server answered, but not with an HTML document.
    NotHtml { content_type: Option<String> },
}

/// Single-shot HTTP GET with a fixed timeout. Never retries.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let is_html = content_type
            .as_ref()
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false);

        if !is_html {
            debug!("Skipping {} ({:?} is not HTML)", url, content_type);
            return Ok(FetchOutcome::NotHtml { content_type });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScanError::fetch_failed(url, e))?;
        debug!("Fetched {} ({} bytes in {:?})", url, body.len(), start.elapsed());

        Ok(FetchOutcome::Html(body))
    }
}
