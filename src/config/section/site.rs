//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com"   # base for every sitemap URL
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Site identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site URL. A path component places sitemaps in a subdirectory
    /// (e.g. "https://example.com/blog").
    pub url: Option<String>,
}

pub struct SiteFields {
    pub url: FieldPath,
}

impl SiteConfig {
    pub const FIELDS: SiteFields = SiteFields {
        url: FieldPath::new("site.url"),
    };

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be set
    /// - `url` must be a valid http(s) URL with a host
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url_str) = &self.url else {
            diag.error_with_hint(
                Self::FIELDS.url,
                "site url is not configured",
                format!("set {}, e.g.: \"https://example.com\"", Self::FIELDS.url),
            );
            return;
        };

        // URL format check using url crate for strict validation
        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
                if parsed.query().is_some() || parsed.fragment().is_some() {
                    diag.error(
                        Self::FIELDS.url,
                        "URL must not carry a query string or fragment",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::FIELDS.url,
                    format!("invalid URL: {}", e),
                    "use format like https://example.com",
                );
            }
        }
    }
}
