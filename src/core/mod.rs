//! Core types - pure abstractions shared across the codebase.

mod error;
mod item;
mod kind;

pub use error::{SitemapError, SitemapResult};
pub use item::{
    PageLinks, SitemapIndexEntry, SitemapItem, SitemapPage, index_url, sitemap_file_name,
};
pub use kind::{ChangeFreq, ItemKind, SitemapKind};
