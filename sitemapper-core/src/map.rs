use serde::{Deserialize, Serialize};
use sitemapper_scanner::{CrawlState, PageRecord, PageType};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_pages: usize,
    pub total_words: usize,
    /// Internal links only.
    pub total_links: usize,
    pub total_images: usize,
}

/// Final output of a crawl run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMap {
    pub domain: String,
    pub summary: Summary,
    pub page_types: BTreeMap<PageType, usize>,
    pub site_structure: BTreeMap<String, Vec<String>>,
    pub pages: BTreeMap<String, PageRecord>,
}

impl SiteMap {
    pub fn from_pages(
        domain: impl Into<String>,
        pages: impl IntoIterator<Item = PageRecord>,
        site_structure: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut summary = Summary::default();
        let mut page_types: BTreeMap<PageType, usize> = BTreeMap::new();
        let mut by_url = BTreeMap::new();

        for page in pages {
            summary.total_pages += 1;
            summary.total_words += page.word_count;
            summary.total_links += page.internal_links_count;
            summary.total_images += page.images_count;
            *page_types.entry(page.page_type).or_insert(0) += 1;
            by_url.insert(page.url.clone(), page);
        }

        Self {
            domain: domain.into(),
            summary,
            page_types,
            site_structure,
            pages: by_url,
        }
    }

    /// The depth-0 page, when the seed itself was crawled.
    pub fn root(&self) -> Option<&PageRecord> {
        self.pages.values().find(|page| page.depth == 0)
    }

    /// Pages ordered by depth, then URL.
    pub fn pages_by_depth(&self) -> Vec<&PageRecord> {
        let mut pages: Vec<&PageRecord> = self.pages.values().collect();
        pages.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.url.cmp(&b.url)));
        pages
    }
}

/// Aggregates a finished crawl into its site map.
pub fn build_site_map(state: &CrawlState) -> SiteMap {
    SiteMap::from_pages(
        state.domain(),
        state.pages.iter().cloned(),
        state.site_structure.clone(),
    )
}
