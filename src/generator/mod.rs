//! Sitemap document generation.
//!
//! A request for a sitemap type and page flows through:
//!
//! - **paginate**: page number → offset/limit window
//! - **source**: window → records (external [`ContentSource`])
//! - **score**: record → priority and changefreq
//! - **xml**: scored entries → `urlset` / `sitemapindex` document
//!
//! The generator holds no mutable state; concurrent requests share nothing.

pub mod paginate;
pub mod score;
pub mod xml;

use crate::config::{PriorityConfig, SitemapperConfig};
use crate::core::{
    ItemKind, PageLinks, SitemapError, SitemapIndexEntry, SitemapItem, SitemapKind, SitemapPage,
    SitemapResult,
};
use crate::debug;
use crate::source::{Clock, ContentSource};
use anyhow::{Context, Result};
use paginate::{page_count, populated_pages, window};
use score::Scorer;
use std::time::Instant;
use xml::{UrlEntry, minify_xml, render_index, render_urlset};

/// Name of the sitemap index pseudo-type.
pub const INDEX_NAME: &str = "index";

/// Settings the generator is constructed with.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Site base URL, used for index entry URLs.
    pub base_url: String,
    pub page_size: u64,
    /// Kinds left out of the index and rejected as unknown.
    pub exclude: Vec<SitemapKind>,
    pub priorities: PriorityConfig,
    pub minify: bool,
    /// URL shape of index entries for pages past the first.
    pub page_links: PageLinks,
}

impl GeneratorOptions {
    /// Options for a site rooted at `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_size: paginate::DEFAULT_PAGE_SIZE,
            exclude: Vec::new(),
            priorities: PriorityConfig::default(),
            minify: false,
            page_links: PageLinks::Query,
        }
    }

    pub fn from_config(config: &SitemapperConfig) -> Result<Self> {
        let base_url = config
            .site
            .url
            .clone()
            .context("`site.url` is required to build sitemap URLs")?;

        Ok(Self {
            base_url,
            page_size: config.sitemap.page_size,
            exclude: config.sitemap.exclude.clone(),
            priorities: config.sitemap.priority.clone(),
            minify: config.build.minify,
            page_links: PageLinks::Query,
        })
    }
}

/// Builds sitemap documents from a content source.
pub struct Generator<S, C> {
    source: S,
    clock: C,
    scorer: Scorer,
    options: GeneratorOptions,
}

impl<S: ContentSource, C: Clock> Generator<S, C> {
    pub fn new(source: S, clock: C, options: GeneratorOptions) -> Self {
        Self {
            source,
            clock,
            scorer: Scorer::new(options.priorities.clone()),
            options,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Kinds served by this generator, in index order.
    pub fn kinds(&self) -> impl Iterator<Item = SitemapKind> + '_ {
        SitemapKind::ALL
            .into_iter()
            .filter(|kind| !self.options.exclude.contains(kind))
    }

    /// Resolve a raw type name to a served kind.
    pub fn resolve_kind(&self, name: &str) -> SitemapResult<SitemapKind> {
        SitemapKind::from_name(name)
            .filter(|kind| !self.options.exclude.contains(kind))
            .ok_or_else(|| SitemapError::InvalidType(name.to_string()))
    }

    /// Generate the document for a raw type name (`index` or a kind name).
    ///
    /// `page` is ignored for the index.
    pub fn generate(&self, name: &str, page: u64) -> SitemapResult<String> {
        if name == INDEX_NAME {
            return self.generate_index();
        }
        let kind = self.resolve_kind(name)?;
        self.generate_page(kind, page)
    }

    /// Generate the sitemap index document.
    pub fn generate_index(&self) -> SitemapResult<String> {
        let started = Instant::now();
        let entries = self.index_entries()?;
        let xml = render_index(&entries);

        debug!("sitemap"; "index: {} entries in {:.2}ms", entries.len(), elapsed_ms(started));
        Ok(self.finish(xml))
    }

    /// Generate one page of a kind's sitemap.
    pub fn generate_page(&self, kind: SitemapKind, page: u64) -> SitemapResult<String> {
        let started = Instant::now();
        let sitemap = self.sitemap_page(kind, page)?;
        let entries: Vec<UrlEntry> = sitemap
            .items
            .iter()
            .map(|item| UrlEntry::from_item(item, &self.scorer))
            .collect();
        let xml = render_urlset(&entries);

        debug!("sitemap"; "{} page {}: {} urls in {:.2}ms", kind, page, entries.len(), elapsed_ms(started));
        Ok(self.finish(xml))
    }

    /// Entries of the sitemap index.
    ///
    /// Each kind contributes one entry per populated page; empty kinds
    /// contribute none.
    pub fn index_entries(&self) -> SitemapResult<Vec<SitemapIndexEntry>> {
        let now = self.clock.now();
        let mut entries = Vec::new();

        for kind in self.kinds() {
            let pages = populated_pages(self.count(kind)?, self.options.page_size)?;
            entries.extend((1..=pages).map(|page| {
                SitemapIndexEntry::new(
                    &self.options.base_url,
                    kind,
                    page,
                    self.options.page_links,
                    now,
                )
            }));
        }

        Ok(entries)
    }

    /// Items of one page of a kind, with `has_more` set.
    ///
    /// Pages past the last one are rejected; page 1 of an empty kind is valid.
    pub fn sitemap_page(&self, kind: SitemapKind, page: u64) -> SitemapResult<SitemapPage> {
        if self.options.exclude.contains(&kind) {
            return Err(SitemapError::InvalidType(kind.name().to_string()));
        }

        let page_size = self.options.page_size;
        let slice = window(page, page_size)?;
        let pages = page_count(self.count(kind)?, page_size)?;
        if page > pages {
            return Err(SitemapError::InvalidPage { page, page_size });
        }

        let now = self.clock.now();
        let records = self
            .source
            .fetch_page(kind, slice.offset, slice.limit)
            .map_err(SitemapError::Source)?;

        let items = records
            .into_iter()
            .map(|record| {
                let item_kind = ItemKind::for_sitemap(kind, record.age_days);
                // Archives have no modification time of their own
                let last_modified = match item_kind {
                    ItemKind::Post { .. } | ItemKind::Page { .. } => record.last_modified,
                    ItemKind::Term { .. } | ItemKind::Author => now,
                };
                SitemapItem {
                    url: record.url,
                    last_modified,
                    kind: item_kind,
                }
            })
            .collect();

        Ok(SitemapPage {
            kind,
            page,
            items,
            has_more: page < pages,
        })
    }

    /// Listable records of a kind.
    pub fn count(&self, kind: SitemapKind) -> SitemapResult<u64> {
        self.source.count_items(kind).map_err(SitemapError::Source)
    }

    /// Pages served for a kind (at least one).
    pub fn pages(&self, kind: SitemapKind) -> SitemapResult<u64> {
        page_count(self.count(kind)?, self.options.page_size)
    }

    /// Pages listed in the index for a kind (zero when empty).
    pub fn populated_pages(&self, kind: SitemapKind) -> SitemapResult<u64> {
        populated_pages(self.count(kind)?, self.options.page_size)
    }

    fn finish(&self, xml: String) -> String {
        if self.options.minify {
            minify_xml(&xml, true).into_owned()
        } else {
            xml
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_micros() as f64 / 1000.0
}
