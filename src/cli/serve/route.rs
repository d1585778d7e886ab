//! Request URL to served document.
//!
//! ```text
//! /sitemap.xml                  → index
//! /sitemap-post.xml             → post, page 1
//! /sitemap-post.xml?paged=3     → post, page 3
//! /sitemap-post-3.xml           → post, page 3 (static build layout)
//! /robots.txt                   → robots
//! ```
//!
//! Paths are matched below the site URL's path, so a site at
//! `https://example.com/blog` serves `/blog/sitemap.xml`.

use crate::core::index_url;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Sitemap { name: String, page: u64 },
    Robots,
    NotFound,
}

impl Route {
    /// Route a raw request URL (path plus optional query).
    pub fn parse(raw_url: &str, base_path: &str) -> Self {
        static RE_SITEMAP: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^/sitemap-([^/]+?)(?:-([0-9]+))?\.xml$").unwrap());

        let (path, query) = raw_url.split_once('?').unwrap_or((raw_url, ""));
        let Some(path) = strip_base(path, base_path) else {
            return Self::NotFound;
        };

        match path {
            "/sitemap.xml" => return Self::Index,
            "/robots.txt" => return Self::Robots,
            _ => {}
        }

        let Some(caps) = RE_SITEMAP.captures(path) else {
            return Self::NotFound;
        };
        let name = caps[1].to_string();
        let page = match caps.get(2) {
            // Too many digits is a page no kind can have
            Some(digits) => digits.as_str().parse().unwrap_or(u64::MAX),
            None => paged_param(query),
        };

        Self::Sitemap {
            name,
            page: page.max(1),
        }
    }
}

/// `paged` query value; missing or non-numeric means the first page.
fn paged_param(query: &str) -> u64 {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "paged")
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(1)
}

fn strip_base<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
    if base_path.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base_path)?;
    rest.starts_with('/').then_some(rest)
}

/// Path component of the site URL without a trailing slash (`""` at the root).
pub fn base_path(site_url: &str) -> String {
    Url::parse(site_url)
        .map(|url| url.path().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

/// `robots.txt` body advertising the sitemap index.
pub fn robots_txt(site_url: &str) -> String {
    format!(
        "User-agent: *\nDisallow:\n\nSitemap: {}\n",
        index_url(site_url)
    )
}
