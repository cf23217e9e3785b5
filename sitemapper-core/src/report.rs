// Report generation from a finished site map

use crate::map::SiteMap;
use serde::{Deserialize, Serialize};
use sitemapper_scanner::PageType;
use sitemapper_scanner::normalize::extract_url_path;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEAVY_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

/// One row of the tabular export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub title: String,
    pub url: String,
    pub page_type: PageType,
    pub word_count: usize,
    pub internal_links_count: usize,
    pub images_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generator: String,
    pub version: String,
    pub generated_at: String,
    pub format: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    report: JsonReportBody<'a>,
}

#[derive(Serialize)]
struct JsonReportBody<'a> {
    metadata: ReportMetadata,
    site_map: &'a SiteMap,
}

#[derive(Deserialize)]
struct ParsedReport {
    report: Option<ParsedReportBody>,
}

#[derive(Deserialize)]
struct ParsedReportBody {
    site_map: SiteMap,
}

pub fn export_rows(site_map: &SiteMap) -> Vec<ExportRow> {
    site_map
        .pages_by_depth()
        .into_iter()
        .map(|page| ExportRow {
            title: page.title.clone(),
            url: page.url.clone(),
            page_type: page.page_type,
            word_count: page.word_count,
            internal_links_count: page.internal_links_count,
            images_count: page.images_count,
        })
        .collect()
}

pub fn generate_json_report(site_map: &SiteMap) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        report: JsonReportBody {
            metadata: ReportMetadata {
                generator: "SiteMapper".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                format: "json".to_string(),
            },
            site_map,
        },
    };

    serde_json::to_string_pretty(&report)
}

/// Reads a site map back from a JSON report, or from a bare site map document.
///
/// The bare form is only tried when there is no `report` member, so errors
/// inside a wrapped report are reported as they are.
pub fn parse_json_report(json: &str) -> Result<SiteMap, serde_json::Error> {
    match serde_json::from_str::<ParsedReport>(json)?.report {
        Some(body) => Ok(body.site_map),
        None => serde_json::from_str::<SiteMap>(json),
    }
}

pub fn generate_csv_report(site_map: &SiteMap) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in export_rows(site_map) {
        writer.serialize(row)?;
    }
    // No rows means serialize never wrote the header.
    if site_map.pages.is_empty() {
        writer.write_record([
            "title",
            "url",
            "page_type",
            "word_count",
            "internal_links_count",
            "images_count",
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

pub fn generate_text_report(site_map: &SiteMap) -> String {
    let mut report = String::new();

    // Header
    report.push_str(HEAVY_RULE);
    report.push_str("                          SITEMAPPER SITE REPORT\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');

    report.push_str(&format!("Domain:       {}\n", site_map.domain));
    report.push_str(&format!("Pages:        {}\n", site_map.summary.total_pages));
    report.push_str(&format!("Words:        {}\n", site_map.summary.total_words));
    report.push_str(&format!("Links:        {}\n", site_map.summary.total_links));
    report.push_str(&format!("Images:       {}\n", site_map.summary.total_images));
    report.push('\n');

    if site_map.pages.is_empty() {
        report.push_str("No pages were mapped.\n");
        return report;
    }

    report.push_str(HEAVY_RULE);
    report.push_str("PAGE TYPES\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');
    for (page_type, count) in &site_map.page_types {
        report.push_str(&format!("  {:<10} {}\n", page_type.as_str(), count));
    }
    report.push('\n');

    report.push_str(HEAVY_RULE);
    report.push_str("SITE STRUCTURE\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');
    report.push_str(&generate_structure_tree(site_map));
    report.push('\n');

    report.push_str(HEAVY_RULE);
    report.push_str("PAGES\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');
    for page in site_map.pages_by_depth() {
        report.push_str(&format!("[{}] {}\n", page.page_type, page.title));
        report.push_str(&format!("  URL:    {}\n", page.url));
        report.push_str(&format!(
            "  Depth {} | {} words | {} internal / {} external links | {} images | {} headings\n",
            page.depth,
            page.word_count,
            page.internal_links_count,
            page.external_links_count,
            page.images_count,
            page.headings_count
        ));
        report.push('\n');
    }

    report
}

/// Renders the parent→child structure as a tree rooted at the seed page.
pub fn generate_structure_tree(site_map: &SiteMap) -> String {
    let Some(root) = site_map.root() else {
        return "  (empty)\n".to_string();
    };

    let mut result = String::new();
    let host = url::Url::parse(&root.url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| site_map.domain.clone());
    result.push_str(&format!("{}{}\n", host, extract_url_path(&root.url)));

    let mut seen = HashSet::new();
    seen.insert(root.url.as_str());
    push_children(site_map, &root.url, "", &mut seen, &mut result);
    result
}

fn push_children<'a>(
    site_map: &'a SiteMap,
    parent: &str,
    indent: &str,
    seen: &mut HashSet<&'a str>,
    out: &mut String,
) {
    let Some(children) = site_map.site_structure.get(parent) else {
        return;
    };

    for (i, child) in children.iter().enumerate() {
        if !seen.insert(child.as_str()) {
            continue;
        }
        let is_last = i == children.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        let label = site_map
            .pages
            .get(child)
            .map(|page| format!("{}  [{}]", extract_url_path(child), page.page_type))
            .unwrap_or_else(|| extract_url_path(child));
        out.push_str(&format!("{}{}{}\n", indent, prefix, label));

        let child_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
        push_children(site_map, child, &child_indent, seen, out);
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
