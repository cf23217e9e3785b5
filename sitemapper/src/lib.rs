// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_crawl_options, parse_seed_url, render_report, resolve_output_path, write_report,
};

// Re-export crawl functionality from sitemapper-core
pub use sitemapper_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use sitemapper_core::report::ReportFormat;
