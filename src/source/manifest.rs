//! Content source backed by a JSON manifest.
//!
//! The manifest is whatever the site exports about its content:
//!
//! ```json
//! {
//!   "posts":      [{ "url": "/hello/", "published": "2025-01-01", "modified": "2025-01-03" }],
//!   "pages":      [{ "url": "/about/", "published": "2024-06-01" }],
//!   "categories": [{ "url": "/category/news/", "count": 12 }],
//!   "tags":       [{ "url": "/tag/rust/", "count": 0 }],
//!   "authors":    [{ "url": "/author/sam/", "count": 4 }]
//! }
//! ```
//!
//! Drafts, empty terms (`count = 0`) and authors without published posts
//! are never listed. Posts are listed most recently modified first; every
//! other kind keeps manifest order.

use super::{ContentSource, SourceRecord};
use crate::core::SitemapKind;
use crate::utils::date::DateTimeUtc;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};
use url::Url;

/// Raw manifest as exported by the site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub posts: Vec<ContentEntry>,
    pub pages: Vec<ContentEntry>,
    pub categories: Vec<ArchiveEntry>,
    pub tags: Vec<ArchiveEntry>,
    pub authors: Vec<ArchiveEntry>,
}

/// A dated post or page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Absolute URL, or path resolved against the site URL.
    pub url: String,
    #[serde(default)]
    pub published: Option<DateTimeUtc>,
    #[serde(default)]
    pub modified: Option<DateTimeUtc>,
    #[serde(default)]
    pub draft: bool,
}

/// A term or author archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub url: String,
    /// Published posts in the archive. Unknown counts are listed.
    #[serde(default, alias = "posts")]
    pub count: Option<u64>,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read content manifest {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse content manifest {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// A resolved, listable record whose age is computed at fetch time.
#[derive(Debug, Clone)]
struct Resolved {
    url: String,
    published: Option<DateTimeUtc>,
    modified: Option<DateTimeUtc>,
}

/// [`ContentSource`] over a parsed [`Manifest`].
///
/// Cloning is cheap: the resolved records are shared.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    records: Arc<FxHashMap<SitemapKind, Vec<Resolved>>>,
    now: DateTimeUtc,
}

impl ManifestSource {
    /// Resolve every listable record against `site_url`.
    ///
    /// `now` is the reference instant for content age.
    pub fn new(manifest: &Manifest, site_url: &str, now: DateTimeUtc) -> Result<Self> {
        let base = base_url(site_url)?;
        let mut records = FxHashMap::default();

        let mut posts = resolve_content(&manifest.posts, &base)?;
        // Most recently modified first; stable so equal times keep manifest order
        posts.sort_by(|a, b| b.modified.or(b.published).cmp(&a.modified.or(a.published)));
        records.insert(SitemapKind::Post, posts);
        records.insert(SitemapKind::Page, resolve_content(&manifest.pages, &base)?);
        records.insert(
            SitemapKind::Category,
            resolve_archives(&manifest.categories, &base)?,
        );
        records.insert(SitemapKind::Tag, resolve_archives(&manifest.tags, &base)?);
        records.insert(
            SitemapKind::Author,
            resolve_archives(&manifest.authors, &base)?,
        );

        Ok(Self {
            records: Arc::new(records),
            now,
        })
    }

    /// Same records, different reference instant.
    pub fn at(mut self, now: DateTimeUtc) -> Self {
        self.now = now;
        self
    }

    fn records(&self, kind: SitemapKind) -> &[Resolved] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }
}

impl ContentSource for ManifestSource {
    fn count_items(&self, kind: SitemapKind) -> Result<u64> {
        Ok(self.records(kind).len() as u64)
    }

    fn fetch_page(&self, kind: SitemapKind, offset: u64, limit: u64) -> Result<Vec<SourceRecord>> {
        let records = self.records(kind);
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(records.len());
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(records[start..]
            .iter()
            .take(limit)
            .map(|record| {
                let published = record.published.or(record.modified).unwrap_or(self.now);
                SourceRecord {
                    url: record.url.clone(),
                    last_modified: record.modified.or(record.published).unwrap_or(self.now),
                    age_days: published.days_until(self.now),
                }
            })
            .collect())
    }
}

/// Site URL with a trailing slash, so relative paths land beneath it.
fn base_url(site_url: &str) -> Result<Url> {
    let with_slash = if site_url.ends_with('/') {
        site_url.to_string()
    } else {
        format!("{site_url}/")
    };
    Url::parse(&with_slash).with_context(|| format!("Invalid site url `{site_url}`"))
}

fn resolve(base: &Url, raw: &str) -> Result<String> {
    let url = base
        .join(raw.trim())
        .with_context(|| format!("Invalid content url `{raw}`"))?;
    Ok(url.into())
}

fn resolve_content(entries: &[ContentEntry], base: &Url) -> Result<Vec<Resolved>> {
    entries
        .iter()
        .filter(|entry| !entry.draft)
        .map(|entry| {
            Ok(Resolved {
                url: resolve(base, &entry.url)?,
                published: entry.published,
                modified: entry.modified,
            })
        })
        .collect()
}

fn resolve_archives(entries: &[ArchiveEntry], base: &Url) -> Result<Vec<Resolved>> {
    entries
        .iter()
        .filter(|entry| entry.count != Some(0))
        .map(|entry| {
            Ok(Resolved {
                url: resolve(base, &entry.url)?,
                published: None,
                modified: None,
            })
        })
        .collect()
}
