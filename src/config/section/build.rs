//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content.json"   # content manifest exported by the site
//! output = "public"          # where `sitemapper build` writes documents
//! minify = false             # strip indentation and newlines
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Content manifest path (relative to project root).
    pub content: PathBuf,
    /// Output directory (relative to project root).
    pub output: PathBuf,
    /// Minify generated XML.
    pub minify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "content.json".into(),
            output: "public".into(),
            minify: false,
        }
    }
}

pub struct BuildFields {
    pub content: FieldPath,
    pub output: FieldPath,
}

impl BuildConfig {
    pub const FIELDS: BuildFields = BuildFields {
        content: FieldPath::new("build.content"),
        output: FieldPath::new("build.output"),
    };

    /// Validate paths after normalization.
    ///
    /// `needs_content`: the current command reads the manifest.
    pub fn validate(&self, needs_content: bool, diag: &mut ConfigDiagnostics) {
        if needs_content && !self.content.is_file() {
            diag.error_with_hint(
                Self::FIELDS.content,
                format!("content manifest `{}` not found", self.content.display()),
                "export the site content as JSON, or point build.content at it",
            );
        }
        if self.output.is_file() {
            diag.error(
                Self::FIELDS.output,
                format!("`{}` is a file, expected a directory", self.output.display()),
            );
        }
    }
}
