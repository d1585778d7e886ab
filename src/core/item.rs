//! Records that flow from the content source into the XML assembler.

use super::{ItemKind, SitemapKind};
use crate::utils::date::DateTimeUtc;

/// A single URL to list in a `urlset` document.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapItem {
    /// Absolute URL.
    pub url: String,
    pub last_modified: DateTimeUtc,
    pub kind: ItemKind,
}

/// One page of a sitemap kind, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapPage {
    pub kind: SitemapKind,
    /// 1-based page number.
    pub page: u64,
    pub items: Vec<SitemapItem>,
    /// More pages follow this one.
    pub has_more: bool,
}

/// A `<sitemap>` entry of the sitemap index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapIndexEntry {
    pub kind: SitemapKind,
    pub page: u64,
    pub url: String,
    pub last_modified: DateTimeUtc,
}

impl SitemapIndexEntry {
    /// Build the entry, deriving its URL from the site base.
    pub fn new(
        base_url: &str,
        kind: SitemapKind,
        page: u64,
        links: PageLinks,
        last_modified: DateTimeUtc,
    ) -> Self {
        Self {
            kind,
            page,
            url: sitemap_url(base_url, kind, page, links),
            last_modified,
        }
    }
}

/// How the index addresses pages past the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLinks {
    /// `sitemap-post.xml?paged=2`, answered by a live server.
    #[default]
    Query,
    /// `sitemap-post-2.xml`, one static file per page.
    File,
}

/// URL of the sitemap index itself.
pub fn index_url(base_url: &str) -> String {
    format!("{}/sitemap.xml", base_url.trim_end_matches('/'))
}

/// File name of one page when every page is its own file.
pub fn sitemap_file_name(kind: SitemapKind, page: u64) -> String {
    if page > 1 {
        format!("sitemap-{kind}-{page}.xml")
    } else {
        format!("sitemap-{kind}.xml")
    }
}

/// URL of one page of a sitemap kind.
///
/// Page 1 is always the bare `sitemap-{kind}.xml`.
pub fn sitemap_url(base_url: &str, kind: SitemapKind, page: u64, links: PageLinks) -> String {
    let base = base_url.trim_end_matches('/');
    match links {
        PageLinks::Query if page > 1 => format!("{base}/sitemap-{kind}.xml?paged={page}"),
        PageLinks::Query | PageLinks::File => format!("{base}/{}", sitemap_file_name(kind, page)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_url_first_page() {
        assert_eq!(
            sitemap_url("https://example.com", SitemapKind::Post, 1, PageLinks::Query),
            "https://example.com/sitemap-post.xml"
        );
    }

    #[test]
    fn test_sitemap_url_later_page() {
        assert_eq!(
            sitemap_url("https://example.com/", SitemapKind::Tag, 3, PageLinks::Query),
            "https://example.com/sitemap-tag.xml?paged=3"
        );
    }

    #[test]
    fn test_index_url_subdirectory() {
        assert_eq!(
            index_url("https://example.com/blog/"),
            "https://example.com/blog/sitemap.xml"
        );
    }

    #[test]
    fn test_index_entry_new() {
        let now = DateTimeUtc::from_ymd(2025, 1, 1);
        let entry = SitemapIndexEntry::new(
            "https://example.com",
            SitemapKind::Author,
            2,
            PageLinks::Query,
            now,
        );
        assert_eq!(entry.url, "https://example.com/sitemap-author.xml?paged=2");
        assert_eq!(entry.page, 2);
        assert_eq!(entry.last_modified, now);
    }

    #[test]
    fn test_file_links() {
        assert_eq!(
            sitemap_url("https://example.com", SitemapKind::Post, 1, PageLinks::File),
            "https://example.com/sitemap-post.xml"
        );
        assert_eq!(
            sitemap_url("https://example.com/", SitemapKind::Tag, 3, PageLinks::File),
            "https://example.com/sitemap-tag-3.xml"
        );
        assert_eq!(sitemap_file_name(SitemapKind::Page, 2), "sitemap-page-2.xml");
    }
}
