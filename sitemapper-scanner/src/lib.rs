pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod normalize;
pub mod page;

pub use config::CrawlConfig;
pub use crawler::{CrawlState, Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetcher::{FetchOutcome, Fetcher};
pub use page::{Heading, Link, PageRecord, PageType};
