//! Structural validation of sitemap documents.
//!
//! [`read_document`] parses a `urlset` or `sitemapindex` into plain entries;
//! [`validate_document`] runs the protocol checks over them and reports
//! each problem with its line and column.

mod reader;
mod rules;

pub use reader::{ParsedDocument, ParsedEntry, read_document};
pub use rules::check_document;

use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Accepted by crawlers, but probably not intended.
    Warning,
    /// Violates the sitemap protocol.
    Error,
    /// The document could not be read at all.
    Fatal,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding, positioned at 1-based line and byte column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: Level, (line, column): (usize, usize), message: impl Into<String>) -> Self {
        Self {
            level,
            line,
            column,
            message: message.into(),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.level, Level::Error | Level::Fatal)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            Level::Warning => self.level.yellow().to_string(),
            Level::Error | Level::Fatal => self.level.red().bold().to_string(),
        };
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, level, self.message
        )
    }
}

/// Read and check a sitemap document.
///
/// Unreadable documents yield a single fatal diagnostic.
pub fn validate_document(xml: &str) -> Vec<Diagnostic> {
    match read_document(xml) {
        Ok(document) => check_document(&document),
        Err(fatal) => vec![fatal],
    }
}
