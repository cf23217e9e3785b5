use serde::{Deserialize, Serialize};
use std::fmt;

/// Title recorded when a page has no usable `<title>`.
pub const NO_TITLE: &str = "No title";

/// Role a page plays on the site, derived from its URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Homepage,
    About,
    Services,
    Contact,
    Blog,
    Page,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Homepage => "homepage",
            PageType::About => "about",
            PageType::Services => "services",
            PageType::Contact => "contact",
            PageType::Blog => "blog",
            PageType::Page => "page",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub anchor_text: String,
}

/// Everything extracted from one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub depth: usize,
    /// Empty for the seed page.
    pub parent_url: String,
    pub page_type: PageType,
    pub text_content: String,
    pub word_count: usize,
    pub char_count: usize,
    pub headings: Vec<Heading>,
    pub internal_links: Vec<Link>,
    pub external_links: Vec<Link>,
    pub images: Vec<String>,
    pub internal_links_count: usize,
    pub external_links_count: usize,
    pub images_count: usize,
    pub headings_count: usize,
}
