//! HTML to [`PageRecord`] extraction.
//!
//! Elements that are not page content (`script`, `style`, `nav`, `footer`,
//! `header`, `aside`) are pruned before anything is collected: their text,
//! links, images and headings never show up in the record.

use crate::normalize::{host_key, is_internal, normalize_url};
use crate::page::{Heading, Link, NO_TITLE, PageRecord, PageType};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

const PRUNED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector is valid"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("img selector is valid"));
static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector is valid")
});

/// Parses one fetched page into its record.
///
/// `url` must already be normalized; it becomes the record key and the base
/// for resolving relative links and images.
pub fn extract_page(html: &str, url: &str, depth: usize, parent_url: &str) -> PageRecord {
    let document = Html::parse_document(html);
    let base = Url::parse(url).ok();
    let page_host = base.as_ref().and_then(host_key).unwrap_or_default();

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let text_content = extract_text(&document);
    let word_count = text_content.split_whitespace().count();
    let char_count = text_content.chars().count();

    let (internal_links, external_links) = match base {
        Some(ref base) => extract_links(&document, base, &page_host),
        None => (Vec::new(), Vec::new()),
    };
    let images = match base {
        Some(ref base) => extract_images(&document, base),
        None => Vec::new(),
    };
    let headings = extract_headings(&document);

    let page_type = classify_page_type(url, &title);

    debug!(
        "Extracted {} ({}): {} words, {} internal / {} external links",
        url,
        page_type,
        word_count,
        internal_links.len(),
        external_links.len()
    );

    PageRecord {
        url: url.to_string(),
        title,
        depth,
        parent_url: parent_url.to_string(),
        page_type,
        text_content,
        word_count,
        char_count,
        internal_links_count: internal_links.len(),
        external_links_count: external_links.len(),
        images_count: images.len(),
        headings_count: headings.len(),
        headings,
        internal_links,
        external_links,
        images,
    }
}

/// Classifies a page from its URL path; the first matching rule wins.
///
/// `_title` is accepted for callers that have it but does not influence
/// the result.
pub fn classify_page_type(url: &str, _title: &str) -> PageType {
    let path = Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase());
    let contains_any = |patterns: &[&str]| patterns.iter().any(|p| path.contains(p));

    if path.is_empty() || path == "/" || contains_any(&["/home", "/index"]) {
        PageType::Homepage
    } else if contains_any(&["/about", "/team"]) {
        PageType::About
    } else if contains_any(&["/service", "/solution"]) {
        PageType::Services
    } else if contains_any(&["/contact"]) {
        PageType::Contact
    } else if contains_any(&["/blog", "/news"]) {
        PageType::Blog
    } else {
        PageType::Page
    }
}

fn is_pruned_tag(element: &ElementRef) -> bool {
    PRUNED_TAGS.contains(&element.value().name())
}

fn is_pruned(element: &ElementRef) -> bool {
    is_pruned_tag(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_pruned_tag(&ancestor))
}

/// Text of an element with runs of whitespace collapsed to one space.
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_text(document: &Html) -> String {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    collect_text(root, &mut parts);
    parts.join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    if is_pruned_tag(&element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed);
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn extract_links(document: &Html, base: &Url, page_host: &str) -> (Vec<Link>, Vec<Link>) {
    let mut internal = Vec::new();
    let mut external = Vec::new();

    for element in document.select(&LINK_SELECTOR) {
        if is_pruned(&element) {
            continue;
        }
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.trim().is_empty() {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            debug!("Dropping unresolvable link {:?} on {}", href, base);
            continue;
        };

        let link = Link {
            url: normalize_url(resolved.as_str()),
            anchor_text: element_text(element),
        };

        if is_internal(&link.url, page_host) {
            internal.push(link);
        } else {
            external.push(link);
        }
    }

    (internal, external)
}

fn extract_images(document: &Html, base: &Url) -> Vec<String> {
    document
        .select(&IMAGE_SELECTOR)
        .filter(|element| !is_pruned(element))
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .filter_map(|src| base.join(src).ok())
        .map(|resolved| resolved.to_string())
        .collect()
}

fn extract_headings(document: &Html) -> Vec<Heading> {
    document
        .select(&HEADING_SELECTOR)
        .filter(|element| !is_pruned(element))
        .filter_map(|element| {
            let level = element.value().name()[1..].parse::<u8>().ok()?;
            let text = element_text(element);
            (!text.is_empty()).then_some(Heading { level, text })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>  Acme   Widgets </title>
    <style>body { color: red; }</style>
</head>
<body>
    <header><a href="/header-link">Header</a><h1>Site banner</h1></header>
    <nav><a href="/nav-link">Nav</a></nav>
    <main>
        <h1>Welcome</h1>
        <p>Hello <b>big</b> world.</p>
        <h3></h3>
        <h2>Our work</h2>
        <a href="/about/">About us</a>
        <a href="https://www.example.com/blog#latest">Blog</a>
        <a href="https://other.org/page">Partner</a>
        <a href="">Empty</a>
        <a href="/contact"></a>
        <img src="/img/logo.png">
        <img src="">
        <script>var hidden = "script text";</script>
    </main>
    <aside><img src="/img/ad.png"></aside>
    <footer>Copyright <a href="/legal">Legal</a></footer>
</body>
</html>"#;

    fn record() -> PageRecord {
        extract_page(PAGE, "https://example.com", 0, "")
    }

    #[test]
    fn test_title_is_collapsed() {
        assert_eq!(record().title, "Acme Widgets");
    }

    #[test]
    fn test_missing_or_empty_title_uses_sentinel() {
        let page = extract_page("<html><body>x</body></html>", "https://example.com/a", 1, "");
        assert_eq!(page.title, NO_TITLE);

        let page = extract_page(
            "<html><head><title>   </title></head></html>",
            "https://example.com/a",
            1,
            "",
        );
        assert_eq!(page.title, NO_TITLE);
    }

    #[test]
    fn test_text_excludes_pruned_elements() {
        let page = record();
        assert!(page.text_content.contains("Hello"));
        assert!(page.text_content.contains("Welcome"));
        assert!(!page.text_content.contains("script text"));
        assert!(!page.text_content.contains("Copyright"));
        assert!(!page.text_content.contains("Site banner"));
        assert!(!page.text_content.contains("color: red"));
        assert!(!page.text_content.contains("Acme"));
    }

    #[test]
    fn test_word_and_char_counts() {
        let page = extract_page(
            "<html><body><p>one two</p><p>three</p></body></html>",
            "https://example.com/x",
            1,
            "https://example.com",
        );
        assert_eq!(page.text_content, "one two three");
        assert_eq!(page.word_count, 3);
        assert_eq!(page.char_count, 13);
    }

    #[test]
    fn test_char_count_uses_characters_not_bytes() {
        let page = extract_page("<body>héllo</body>", "https://example.com/x", 1, "");
        assert_eq!(page.char_count, 5);
    }

    #[test]
    fn test_links_are_resolved_normalized_and_split() {
        let page = record();

        let internal: Vec<&str> = page.internal_links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            internal,
            vec![
                "https://example.com/about",
                "https://www.example.com/blog",
                "https://example.com/contact",
            ]
        );
        assert_eq!(page.internal_links[0].anchor_text, "About us");
        assert_eq!(page.internal_links[2].anchor_text, "");

        assert_eq!(page.external_links.len(), 1);
        assert_eq!(page.external_links[0].url, "https://other.org/page");
        assert_eq!(page.external_links[0].anchor_text, "Partner");

        assert_eq!(page.internal_links_count, 3);
        assert_eq!(page.external_links_count, 1);
    }

    #[test]
    fn test_links_inside_pruned_elements_are_ignored() {
        let page = record();
        let all: Vec<&str> = page
            .internal_links
            .iter()
            .chain(page.external_links.iter())
            .map(|l| l.url.as_str())
            .collect();
        assert!(!all.iter().any(|u| u.contains("nav-link")));
        assert!(!all.iter().any(|u| u.contains("header-link")));
        assert!(!all.iter().any(|u| u.contains("legal")));
    }

    #[test]
    fn test_images_are_resolved_but_not_normalized() {
        let page = record();
        assert_eq!(page.images, vec!["https://example.com/img/logo.png"]);
        assert_eq!(page.images_count, 1);

        let page = extract_page(
            r#"<body><img src="pics/"></body>"#,
            "https://example.com/gallery/index.html",
            1,
            "",
        );
        assert_eq!(page.images, vec!["https://example.com/gallery/pics/"]);
    }

    #[test]
    fn test_headings_in_document_order_without_empty() {
        let page = record();
        assert_eq!(
            page.headings,
            vec![
                Heading { level: 1, text: "Welcome".to_string() },
                Heading { level: 2, text: "Our work".to_string() },
            ]
        );
        assert_eq!(page.headings_count, 2);
    }

    #[test]
    fn test_record_carries_crawl_position() {
        let page = extract_page("<body></body>", "https://example.com/team", 2, "https://example.com");
        assert_eq!(page.url, "https://example.com/team");
        assert_eq!(page.depth, 2);
        assert_eq!(page.parent_url, "https://example.com");
        assert_eq!(page.page_type, PageType::About);
        assert_eq!(page.word_count, 0);
    }

    #[test]
    fn test_classify_homepage() {
        assert_eq!(classify_page_type("https://example.com", ""), PageType::Homepage);
        assert_eq!(classify_page_type("https://example.com/", ""), PageType::Homepage);
        assert_eq!(classify_page_type("https://example.com/Home", ""), PageType::Homepage);
        assert_eq!(
            classify_page_type("https://example.com/index.html", ""),
            PageType::Homepage
        );
    }

    #[test]
    fn test_classify_by_path() {
        assert_eq!(classify_page_type("https://example.com/about-us", ""), PageType::About);
        assert_eq!(classify_page_type("https://example.com/our-team", "x"), PageType::Page);
        assert_eq!(classify_page_type("https://example.com/team", ""), PageType::About);
        assert_eq!(
            classify_page_type("https://example.com/services/web", ""),
            PageType::Services
        );
        assert_eq!(
            classify_page_type("https://example.com/solutions", ""),
            PageType::Services
        );
        assert_eq!(classify_page_type("https://example.com/contact", ""), PageType::Contact);
        assert_eq!(
            classify_page_type("https://example.com/2024/news/item", ""),
            PageType::Blog
        );
        assert_eq!(classify_page_type("https://example.com/pricing", ""), PageType::Page);
    }

    #[test]
    fn test_classify_priority_order() {
        // about is checked before blog
        assert_eq!(
            classify_page_type("https://example.com/blog/about", ""),
            PageType::About
        );
        // homepage rules come first
        assert_eq!(
            classify_page_type("https://example.com/home/contact", ""),
            PageType::Homepage
        );
    }

    #[test]
    fn test_classify_ignores_title_and_query() {
        assert_eq!(
            classify_page_type("https://example.com/pricing?ref=/about", "About us"),
            PageType::Page
        );
    }
}
