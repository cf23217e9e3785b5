use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to fetch {url}: {cause}")]
    FetchFailed { url: String, cause: String },

    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },
}

impl ScanError {
    /// Wraps a transport-level failure with the URL it happened on.
    pub fn fetch_failed(url: &str, cause: impl std::fmt::Display) -> Self {
        ScanError::FetchFailed {
            url: url.to_string(),
            cause: cause.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
