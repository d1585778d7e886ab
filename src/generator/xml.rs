//! Sitemap XML assembly.
//!
//! Renders the two sitemaps.org 0.9 document kinds.
//!
//! # Formats
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" ...>
//!   <url>
//!     <loc>https://example.com/hello/</loc>
//!     <lastmod>2025-01-01T00:00:00+00:00</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.8</priority>
//!   </url>
//! </urlset>
//! ```
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" ...>
//!   <sitemap>
//!     <loc>https://example.com/sitemap-post.xml</loc>
//!     <lastmod>2025-01-01T00:00:00+00:00</lastmod>
//!   </sitemap>
//! </sitemapindex>
//! ```

use super::score::Scorer;
use crate::core::{ChangeFreq, SitemapIndexEntry, SitemapItem};
use crate::utils::date::DateTimeUtc;
use std::borrow::Cow;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Root element of a sitemap document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    UrlSet,
    SitemapIndex,
}

impl DocumentKind {
    pub const fn root(self) -> &'static str {
        match self {
            Self::UrlSet => "urlset",
            Self::SitemapIndex => "sitemapindex",
        }
    }

    /// Element wrapping each entry.
    pub const fn entry(self) -> &'static str {
        match self {
            Self::UrlSet => "url",
            Self::SitemapIndex => "sitemap",
        }
    }

    pub const fn schema_location(self) -> &'static str {
        match self {
            Self::UrlSet => "http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd",
            Self::SitemapIndex => "http://www.sitemaps.org/schemas/sitemap/0.9/siteindex.xsd",
        }
    }

    pub fn from_root(name: &str) -> Option<Self> {
        match name {
            "urlset" => Some(Self::UrlSet),
            "sitemapindex" => Some(Self::SitemapIndex),
            _ => None,
        }
    }
}

/// A scored `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: DateTimeUtc,
    pub changefreq: ChangeFreq,
    pub priority: f64,
}

impl UrlEntry {
    pub fn from_item(item: &SitemapItem, scorer: &Scorer) -> Self {
        Self {
            loc: item.url.clone(),
            lastmod: item.last_modified,
            changefreq: scorer.changefreq(&item.kind),
            priority: scorer.priority(&item.kind),
        }
    }
}

/// Render a `urlset` document. No entries still yields a valid empty root.
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let mut xml = open_document(DocumentKind::UrlSet, entries.len() * 160);

    for entry in entries {
        xml.push_str("  <url>\n");
        push_element(&mut xml, "loc", &entry.loc);
        push_element(&mut xml, "lastmod", &entry.lastmod.to_rfc3339());
        push_element(&mut xml, "changefreq", entry.changefreq.as_str());
        push_element(&mut xml, "priority", &format_priority(entry.priority));
        xml.push_str("  </url>\n");
    }

    close_document(xml, DocumentKind::UrlSet)
}

/// Render a `sitemapindex` document.
pub fn render_index(entries: &[SitemapIndexEntry]) -> String {
    let mut xml = open_document(DocumentKind::SitemapIndex, entries.len() * 120);

    for entry in entries {
        xml.push_str("  <sitemap>\n");
        push_element(&mut xml, "loc", &entry.url);
        push_element(&mut xml, "lastmod", &entry.last_modified.to_rfc3339());
        xml.push_str("  </sitemap>\n");
    }

    close_document(xml, DocumentKind::SitemapIndex)
}

/// Priority with exactly one decimal place.
pub fn format_priority(priority: f64) -> String {
    format!("{priority:.1}")
}

fn open_document(kind: DocumentKind, capacity: usize) -> String {
    let mut xml = String::with_capacity(capacity + 512);
    xml.push_str(XML_DECL);
    xml.push('\n');
    xml.push('<');
    xml.push_str(kind.root());
    xml.push_str(" xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\" xmlns:xsi=\"");
    xml.push_str(XSI_NS);
    xml.push_str("\" xsi:schemaLocation=\"");
    xml.push_str(SITEMAP_NS);
    xml.push(' ');
    xml.push_str(kind.schema_location());
    xml.push_str("\">\n");
    xml
}

fn close_document(mut xml: String, kind: DocumentKind) -> String {
    xml.push_str("</");
    xml.push_str(kind.root());
    xml.push_str(">\n");
    xml
}

fn push_element(xml: &mut String, name: &str, text: &str) {
    xml.push_str("    <");
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&escape_xml(text));
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Minify XML content if enabled.
pub fn minify_xml(content: &str, enabled: bool) -> Cow<'_, str> {
    if enabled {
        let minified = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        Cow::Owned(minified)
    } else {
        Cow::Borrowed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemKind, PageLinks, SitemapKind};

    fn entry(loc: &str) -> UrlEntry {
        UrlEntry {
            loc: loc.to_string(),
            lastmod: DateTimeUtc::from_ymd(2025, 1, 1),
            changefreq: ChangeFreq::Weekly,
            priority: 0.8,
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_escape_xml_title_like_text() {
        assert_eq!(escape_xml("A & B <Co>"), "A &amp; B &lt;Co&gt;");
        // Already-escaped text is escaped again, never passed through
        assert_eq!(escape_xml("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_urlset_empty() {
        let xml = render_urlset(&[]);

        assert!(xml.starts_with(XML_DECL));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}""#)));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_urlset_declares_schema() {
        let xml = render_urlset(&[]);
        assert!(xml.contains(&format!(r#"xmlns:xsi="{XSI_NS}""#)));
        assert!(xml.contains("sitemap/0.9/sitemap.xsd\""));
    }

    #[test]
    fn test_urlset_single_entry_order() {
        let xml = render_urlset(&[entry("https://example.com/")]);

        let loc = xml.find("<loc>https://example.com/</loc>").unwrap();
        let lastmod = xml
            .find("<lastmod>2025-01-01T00:00:00+00:00</lastmod>")
            .unwrap();
        let changefreq = xml.find("<changefreq>weekly</changefreq>").unwrap();
        let priority = xml.find("<priority>0.8</priority>").unwrap();
        assert!(loc < lastmod && lastmod < changefreq && changefreq < priority);
    }

    #[test]
    fn test_urlset_multiple_entries() {
        let xml = render_urlset(&[
            entry("https://example.com/"),
            entry("https://example.com/posts/hello/"),
            entry("https://example.com/about/"),
        ]);

        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("</url>").count(), 3);
        let first = xml.find("https://example.com/posts/hello/").unwrap();
        let second = xml.find("https://example.com/about/").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_urlset_escapes_loc() {
        let xml = render_urlset(&[entry("https://example.com/A & B <Co>")]);
        assert!(xml.contains("<loc>https://example.com/A &amp; B &lt;Co&gt;</loc>"));
        assert!(!xml.contains("A & B"));
    }

    #[test]
    fn test_priority_one_decimal() {
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.1), "0.1");
        assert_eq!(format_priority(0.84), "0.8");
        assert_eq!(format_priority(0.96), "1.0");
        assert_eq!(format_priority(0.5), "0.5");
    }

    #[test]
    fn test_index_document() {
        let now = DateTimeUtc::from_ymd(2025, 3, 4);
        let xml = render_index(&[
            SitemapIndexEntry::new("https://example.com", SitemapKind::Post, 1, PageLinks::Query, now),
            SitemapIndexEntry::new("https://example.com", SitemapKind::Post, 2, PageLinks::Query, now),
        ]);

        assert!(xml.contains("<sitemapindex xmlns="));
        assert!(xml.contains("siteindex.xsd"));
        assert_eq!(xml.matches("<sitemap>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/sitemap-post.xml</loc>"));
        assert!(xml.contains("<loc>https://example.com/sitemap-post.xml?paged=2</loc>"));
        assert!(xml.contains("<lastmod>2025-03-04T00:00:00+00:00</lastmod>"));
        assert!(xml.trim_end().ends_with("</sitemapindex>"));
    }

    #[test]
    fn test_index_empty() {
        let xml = render_index(&[]);
        assert!(xml.contains("<sitemapindex"));
        assert!(xml.contains("</sitemapindex>"));
        assert!(!xml.contains("<sitemap>"));
    }

    #[test]
    fn test_xml_structure() {
        let xml = render_urlset(&[entry("https://example.com/")]);

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], XML_DECL);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(lines.last().map(|l| l.trim()), Some("</urlset>"));
    }

    #[test]
    fn test_entry_from_item() {
        let item = SitemapItem {
            url: "https://example.com/p".into(),
            last_modified: DateTimeUtc::from_ymd(2024, 5, 1),
            kind: ItemKind::Post { age_days: 400.0 },
        };
        let entry = UrlEntry::from_item(&item, &Scorer::default());
        assert_eq!(entry.changefreq, ChangeFreq::Yearly);
        assert_eq!(format_priority(entry.priority), "0.1");
        assert_eq!(entry.lastmod, item.last_modified);
    }

    #[test]
    fn test_minify_xml() {
        let xml = render_urlset(&[entry("https://example.com/")]);
        let minified = minify_xml(&xml, true);

        assert!(!minified.contains('\n'));
        assert!(minified.contains("<url><loc>https://example.com/</loc>"));
        assert_eq!(minify_xml(&xml, false), xml.as_str());
    }
}
