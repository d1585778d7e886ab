//! Sitemap and item kind definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sitemap type exposed to callers, one `sitemap-{name}.xml` family each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapKind {
    Post,
    Page,
    Category,
    Tag,
    Author,
}

impl SitemapKind {
    /// All kinds, in the order they appear in the sitemap index.
    pub const ALL: [Self; 5] = [
        Self::Post,
        Self::Page,
        Self::Category,
        Self::Tag,
        Self::Author,
    ];

    /// Name used in URLs, cache keys and the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Author => "author",
        }
    }

    /// Look up a kind by its URL name (case-sensitive, like the rewrite rules).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for SitemapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-item variant, resolved once when a content record is adapted.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Blog post; priority decays with age.
    Post { age_days: f64 },
    /// Static page; fixed priority, changefreq from age.
    Page { age_days: f64 },
    /// Taxonomy term archive (category, tag, ...).
    Term { taxonomy: String },
    /// Author archive.
    Author,
}

impl ItemKind {
    /// Build the variant matching a sitemap kind.
    ///
    /// `age_days` is only kept for posts and pages.
    pub fn for_sitemap(kind: SitemapKind, age_days: f64) -> Self {
        match kind {
            SitemapKind::Post => Self::Post { age_days },
            SitemapKind::Page => Self::Page { age_days },
            SitemapKind::Category => Self::Term {
                taxonomy: "category".into(),
            },
            SitemapKind::Tag => Self::Term {
                taxonomy: "post_tag".into(),
            },
            SitemapKind::Author => Self::Author,
        }
    }

    /// Age in days for dated content, `None` for archives.
    pub fn age_days(&self) -> Option<f64> {
        match self {
            Self::Post { age_days } | Self::Page { age_days } => Some(*age_days),
            Self::Term { .. } | Self::Author => None,
        }
    }
}

/// Crawler hint for how often a URL changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "always" => Self::Always,
            "hourly" => Self::Hourly,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            "never" => Self::Never,
            _ => return None,
        })
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
