//! Content collaborators consumed by the generator.
//!
//! The generator never talks to a CMS directly. It asks a [`ContentSource`]
//! how many records a kind has and for one window of them, and a [`Clock`]
//! for the current time.

mod clock;
mod manifest;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::FixedClock;
pub use manifest::{Manifest, ManifestSource};

use crate::core::SitemapKind;
use crate::utils::date::DateTimeUtc;
use anyhow::Result;

/// One record as supplied by a content source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// Absolute URL.
    pub url: String,
    pub last_modified: DateTimeUtc,
    /// Days since publication. Only meaningful for posts and pages.
    pub age_days: f64,
}

/// Supplier of listable content.
pub trait ContentSource {
    /// Number of listable records of `kind`.
    fn count_items(&self, kind: SitemapKind) -> Result<u64>;

    /// Up to `limit` records of `kind`, starting at `offset`, in listing order.
    fn fetch_page(&self, kind: SitemapKind, offset: u64, limit: u64) -> Result<Vec<SourceRecord>>;
}

impl<T: ContentSource + ?Sized> ContentSource for &T {
    fn count_items(&self, kind: SitemapKind) -> Result<u64> {
        (**self).count_items(kind)
    }

    fn fetch_page(&self, kind: SitemapKind, offset: u64, limit: u64) -> Result<Vec<SourceRecord>> {
        (**self).fetch_page(kind, offset, limit)
    }
}
