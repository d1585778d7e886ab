//! Page arithmetic for splitting a kind's items across sitemap files.

use crate::core::{SitemapError, SitemapResult};

/// Items per sitemap file when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 2000;

/// Hard cap from the sitemaps.org protocol.
pub const MAX_PAGE_SIZE: u64 = 50_000;

/// Offset/limit slice of a kind's items for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Number of pages needed for `total_items`, never less than one.
pub fn page_count(total_items: u64, page_size: u64) -> SitemapResult<u64> {
    if page_size == 0 {
        return Err(SitemapError::InvalidPage { page: 1, page_size });
    }
    Ok(total_items.div_ceil(page_size).max(1))
}

/// Number of pages that actually hold items (zero for an empty kind).
///
/// The sitemap index lists exactly this many pages per kind.
pub fn populated_pages(total_items: u64, page_size: u64) -> SitemapResult<u64> {
    if page_size == 0 {
        return Err(SitemapError::InvalidPage { page: 1, page_size });
    }
    Ok(total_items.div_ceil(page_size))
}

/// Offset/limit window of a 1-based page.
pub fn window(page: u64, page_size: u64) -> SitemapResult<Window> {
    let invalid = || SitemapError::InvalidPage { page, page_size };
    if page == 0 || page_size == 0 {
        return Err(invalid());
    }
    let offset = (page - 1).checked_mul(page_size).ok_or_else(invalid)?;
    Ok(Window {
        offset,
        limit: page_size,
    })
}
