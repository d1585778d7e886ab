//! `[sitemap]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sitemap]
//! page_size = 2000          # items per sitemap file
//! exclude = ["author"]      # kinds left out entirely
//!
//! [sitemap.priority]
//! page = 0.8                # fixed priority of static pages
//! taxonomy = 0.5            # categories and tags
//! author = 0.5
//! ```
//!
//! Post priority is not configurable: it decays with age.

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::SitemapKind;
use crate::generator::paginate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::generator::score::{MAX_PRIORITY, MIN_PRIORITY};
use serde::{Deserialize, Serialize};

/// Sitemap generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapSectionConfig {
    /// Items per sitemap file.
    pub page_size: u64,
    /// Kinds left out of the index and answered as unknown.
    pub exclude: Vec<SitemapKind>,
    /// Fixed priorities of non-post items.
    pub priority: PriorityConfig,
}

impl Default for SitemapSectionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            exclude: Vec::new(),
            priority: PriorityConfig::default(),
        }
    }
}

/// `[sitemap.priority]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    pub page: f64,
    pub taxonomy: f64,
    pub author: f64,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            page: 0.8,
            taxonomy: 0.5,
            author: 0.5,
        }
    }
}

pub struct SitemapFields {
    pub page_size: FieldPath,
    pub exclude: FieldPath,
    pub priority_page: FieldPath,
    pub priority_taxonomy: FieldPath,
    pub priority_author: FieldPath,
}

impl SitemapSectionConfig {
    pub const FIELDS: SitemapFields = SitemapFields {
        page_size: FieldPath::new("sitemap.page_size"),
        exclude: FieldPath::new("sitemap.exclude"),
        priority_page: FieldPath::new("sitemap.priority.page"),
        priority_taxonomy: FieldPath::new("sitemap.priority.taxonomy"),
        priority_author: FieldPath::new("sitemap.priority.author"),
    };

    /// Validate sitemap configuration.
    ///
    /// # Checks
    /// - `page_size` within 1..=50000 (protocol limit)
    /// - every priority within the scorer's bounds
    /// - `exclude` leaves at least one kind
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            diag.error_with_hint(
                Self::FIELDS.page_size,
                format!("page size {} out of range", self.page_size),
                format!("use a value between 1 and {MAX_PAGE_SIZE}"),
            );
        }

        for (field, value) in [
            (Self::FIELDS.priority_page, self.priority.page),
            (Self::FIELDS.priority_taxonomy, self.priority.taxonomy),
            (Self::FIELDS.priority_author, self.priority.author),
        ] {
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&value) {
                diag.error_with_hint(
                    field,
                    format!("priority {value} out of range"),
                    format!("use a value between {MIN_PRIORITY:.1} and {MAX_PRIORITY:.1}"),
                );
            }
        }

        if SitemapKind::ALL
            .iter()
            .all(|kind| self.exclude.contains(kind))
        {
            diag.error(Self::FIELDS.exclude, "every sitemap kind is excluded");
        }
    }
}
