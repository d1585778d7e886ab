//! `validate` command: check sitemap files against the sitemap protocol.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use rayon::prelude::*;

use crate::log;
use crate::utils::plural::{plural_count, plural_s};
use crate::validate::{Diagnostic, Level, validate_document};

/// Findings for every checked file, keyed by path.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub files: BTreeMap<String, Vec<Diagnostic>>,
}

impl ValidationReport {
    /// Check each file. Unreadable files become fatal findings.
    pub fn check(paths: &[PathBuf]) -> Self {
        let files = paths
            .par_iter()
            .map(|path| {
                let diagnostics = match fs::read_to_string(path) {
                    Ok(xml) => validate_document(&xml),
                    Err(e) => vec![Diagnostic::new(Level::Fatal, (0, 0), e.to_string())],
                };
                (path.display().to_string(), diagnostics)
            })
            .collect();
        Self { files }
    }

    pub fn count(&self, errors: bool) -> usize {
        self.files
            .values()
            .flatten()
            .filter(|d| d.is_error() == errors)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(true)
    }

    pub fn warning_count(&self) -> usize {
        self.count(false)
    }

    /// Print findings grouped by file to stderr.
    pub fn print(&self) {
        for (path, diagnostics) in &self.files {
            if diagnostics.is_empty() {
                continue;
            }
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for diagnostic in diagnostics {
                let arrow = if diagnostic.is_error() {
                    "→".red().to_string()
                } else {
                    "→".yellow().to_string()
                };
                eprintln!("{arrow} {diagnostic}");
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.error_count();
        let warnings = self.warning_count();

        if errors == 0 && warnings == 0 {
            return write!(f, "{}", "all checks passed".green());
        }
        write!(
            f,
            "{} error{}, {} warning{}",
            errors,
            plural_s(errors),
            warnings,
            plural_s(warnings)
        )
    }
}

/// Validate sitemap files, failing on any error unless `warn_only`.
pub fn validate_files(files: &[PathBuf], warn_only: bool) -> Result<()> {
    log!("validate"; "checking {}", plural_count(files.len(), "file"));

    let report = ValidationReport::check(files);
    report.print();
    log!("validate"; "{}", report);

    let errors = report.error_count();
    if errors > 0 && !warn_only {
        bail!("validation failed with {}", plural_count(errors, "error"));
    }
    Ok(())
}
