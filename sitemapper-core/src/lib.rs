pub mod crawl;
pub mod map;
pub mod report;

pub use map::{SiteMap, Summary, build_site_map};

/// Written to stderr; stdout is reserved for reports.
pub fn print_banner() {
    eprintln!(
        r#"
   ___ _ _       __  __
  / __(_) |_ ___|  \/  |__ _ _ __ _ __  ___ _ _
  \__ \ |  _/ -_) |\/| / _` | '_ \ '_ \/ -_) '_|
  |___/_|\__\___|_|  |_\__,_| .__/ .__/\___|_|
                            |_|  |_|      v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
