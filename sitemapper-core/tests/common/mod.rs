// Shared fixtures for the integration tests

#![allow(dead_code)]

use sitemapper_core::SiteMap;
use sitemapper_scanner::{Heading, Link, PageRecord, PageType};
use std::collections::BTreeMap;

pub fn page(
    url: &str,
    depth: usize,
    parent: &str,
    page_type: PageType,
    words: usize,
    internal: &[&str],
    images: usize,
) -> PageRecord {
    let internal_links: Vec<Link> = internal
        .iter()
        .map(|u| Link {
            url: u.to_string(),
            anchor_text: format!("link to {}", u),
        })
        .collect();
    let images: Vec<String> = (0..images)
        .map(|i| format!("{}/img/{}.png", url, i))
        .collect();
    let text_content = vec!["word"; words].join(" ");

    PageRecord {
        url: url.to_string(),
        title: format!("Title of {}", url),
        depth,
        parent_url: parent.to_string(),
        page_type,
        char_count: text_content.chars().count(),
        text_content,
        word_count: words,
        headings: vec![Heading {
            level: 1,
            text: "Heading".to_string(),
        }],
        internal_links_count: internal_links.len(),
        external_links: vec![Link {
            url: "https://other.org".to_string(),
            anchor_text: "Other".to_string(),
        }],
        external_links_count: 1,
        images_count: images.len(),
        images,
        headings_count: 1,
        internal_links,
    }
}

/// A three page site: home linking to about and blog.
pub fn sample_site_map() -> SiteMap {
    let home = "https://example.com";
    let about = "https://example.com/about";
    let blog = "https://example.com/blog";

    let pages = vec![
        page(home, 0, "", PageType::Homepage, 120, &[about, blog], 2),
        page(about, 1, home, PageType::About, 80, &[home], 1),
        page(blog, 1, home, PageType::Blog, 300, &[home, about], 0),
    ];

    let mut structure = BTreeMap::new();
    structure.insert(home.to_string(), vec![about.to_string(), blog.to_string()]);

    SiteMap::from_pages("example.com", pages, structure)
}
