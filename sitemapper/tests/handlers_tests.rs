use sitemapper::handlers::*;
use sitemapper::ReportFormat;
use sitemapper_core::SiteMap;
use sitemapper_core::report::parse_json_report;
use sitemapper_scanner::PageRecord;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn empty_site_map() -> SiteMap {
    SiteMap::from_pages("example.com", Vec::<PageRecord>::new(), BTreeMap::new())
}

#[test]
fn test_parse_seed_url_with_scheme() {
    let result = parse_seed_url("https://example.com/");
    assert_eq!(result, Ok("https://example.com".to_string()));

    let result = parse_seed_url("http://example.com/blog");
    assert_eq!(result, Ok("http://example.com/blog".to_string()));
}

#[test]
fn test_parse_seed_url_without_scheme() {
    let result = parse_seed_url("  example.com  ");
    assert_eq!(result, Ok("https://example.com".to_string()));
}

#[test]
fn test_parse_seed_url_canonical_host() {
    let result = parse_seed_url("HTTPS://Example.com:443/");
    assert_eq!(result, Ok("https://example.com".to_string()));
}

#[test]
fn test_parse_seed_url_rejects_other_schemes() {
    let result = parse_seed_url("ftp://example.com");
    assert!(result.unwrap_err().contains("Unsupported scheme 'ftp'"));

    let result = parse_seed_url("mailto:team@example.com");
    assert!(result.is_err());
}

#[test]
fn test_parse_seed_url_invalid() {
    assert!(parse_seed_url("").is_err());
    assert!(parse_seed_url("not a valid url!!!").is_err());
}

#[test]
fn test_build_crawl_options() {
    let options = build_crawl_options("example.com", 5, 2, 0, 10).unwrap();

    assert_eq!(options.url, "https://example.com");
    assert_eq!(options.max_pages, 5);
    assert_eq!(options.max_depth, 2);
    assert_eq!(options.request_interval, Duration::ZERO);
    assert_eq!(options.timeout, Duration::from_secs(10));
    assert!(!options.show_progress_bars);
}

#[test]
fn test_build_crawl_options_rejects_zero_budgets() {
    assert!(build_crawl_options("example.com", 0, 3, 500, 30).is_err());
    assert!(build_crawl_options("example.com", 15, 0, 500, 30).is_err());
    assert!(build_crawl_options("example.com", 15, 3, 500, 0).is_err());
}

#[test]
fn test_render_report_formats() {
    let site_map = empty_site_map();

    let text = render_report(ReportFormat::Text, &site_map).unwrap();
    assert!(text.contains("Domain:       example.com"));

    let json = render_report(ReportFormat::Json, &site_map).unwrap();
    let parsed = parse_json_report(&json).unwrap();
    assert_eq!(parsed.domain, "example.com");

    let csv = render_report(ReportFormat::Csv, &site_map).unwrap();
    assert!(csv.starts_with("title,url,page_type"));
}

#[test]
fn test_resolve_output_path_plain() {
    let path = resolve_output_path(Path::new("reports/site.json"));
    assert_eq!(path, Path::new("reports/site.json"));
}

#[test]
fn test_resolve_output_path_expands_tilde() {
    let path = resolve_output_path(Path::new("~/site.json"));
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with("site.json"));
}

#[test]
fn test_write_report_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let target = temp_dir.path().join("report.txt");

    let written = write_report("hello report\n", Some(target.as_path()))?;

    assert_eq!(written, Some(target.clone()));
    assert_eq!(std::fs::read_to_string(&target)?, "hello report\n");
    Ok(())
}

#[test]
fn test_write_report_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("missing").join("report.txt");

    let err = write_report("x", Some(target.as_path())).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to write report"));
}
