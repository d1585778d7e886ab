//! Errors raised while generating a sitemap document.

use thiserror::Error;

/// Generation failures. All are reported straight to the caller.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Requested sitemap type is not recognized (or is excluded).
    #[error("invalid sitemap type `{0}`")]
    InvalidType(String),

    /// Page number or page size out of range.
    #[error("invalid page {page} (page size {page_size})")]
    InvalidPage { page: u64, page_size: u64 },

    /// The content source failed to count or fetch records.
    #[error("content source error")]
    Source(#[source] anyhow::Error),
}

impl SitemapError {
    /// Whether the caller should answer with a not-found response.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::InvalidType(_) | Self::InvalidPage { .. })
    }
}

pub type SitemapResult<T> = std::result::Result<T, SitemapError>;
