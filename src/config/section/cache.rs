//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! enable = true    # keep rendered documents in memory while serving
//! ttl = 86400      # seconds before a cached document expires
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One day, the default document lifetime.
pub const DEFAULT_CACHE_TTL: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enable: bool,
    /// Lifetime of a cached document, in seconds.
    pub ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

pub struct CacheFields {
    pub ttl: FieldPath,
}

impl CacheConfig {
    pub const FIELDS: CacheFields = CacheFields {
        ttl: FieldPath::new("cache.ttl"),
    };

    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enable && self.ttl == 0 {
            diag.error_with_hint(
                Self::FIELDS.ttl,
                "cache is enabled with a zero ttl",
                "set cache.enable = false to disable caching",
            );
        }
    }
}
