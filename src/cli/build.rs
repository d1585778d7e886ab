//! `build` command: write every sitemap document to the output directory.
//!
//! # Output layout
//!
//! ```text
//! public/
//! ├── sitemap.xml          # index
//! ├── sitemap-post.xml     # post page 1
//! ├── sitemap-post-2.xml   # post page 2
//! └── sitemap-page.xml
//! ```
//!
//! The index written here links every page by its file name, so the output
//! works from any static host. Sitemap files left over from an earlier build
//! are removed first.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::common::load_source;
use crate::config::SitemapperConfig;
use crate::core::{PageLinks, SitemapKind, sitemap_file_name};
use crate::generator::{Generator, GeneratorOptions, INDEX_NAME};
use crate::source::SystemClock;
use crate::{debug, log};
use crate::utils::plural::plural_count;

/// One document to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Index,
    Page(SitemapKind, u64),
}

impl Job {
    fn file_name(self) -> String {
        match self {
            Self::Index => "sitemap.xml".to_string(),
            Self::Page(kind, page) => sitemap_file_name(kind, page),
        }
    }
}

/// Whether `name` is a file this command writes.
fn is_sitemap_file(name: &str) -> bool {
    name == "sitemap.xml" || (name.starts_with("sitemap-") && name.ends_with(".xml"))
}

/// Delete sitemap files from an earlier build. Returns how many were removed.
fn remove_stale(output: &Path) -> Result<usize> {
    let mut removed = 0;
    let entries = fs::read_dir(output)
        .with_context(|| format!("Failed to read output directory {}", output.display()))?;

    for entry in entries {
        let entry = entry?;
        let stale = entry.file_type()?.is_file()
            && entry.file_name().to_str().is_some_and(is_sitemap_file);
        if stale {
            let path = entry.path();
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Render the index and every populated page, in parallel.
///
/// Returns the written paths, index first.
pub fn build_sitemaps(config: &SitemapperConfig) -> Result<Vec<PathBuf>> {
    let started = Instant::now();
    let source = load_source(config)?;
    let mut options = GeneratorOptions::from_config(config)?;
    options.page_links = PageLinks::File;
    let generator = Generator::new(&source, SystemClock, options);
    let output = &config.build.output;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;
    let removed = remove_stale(output)?;
    if removed > 0 {
        debug!("build"; "removed {} from a previous build", plural_count(removed, "sitemap"));
    }

    let mut jobs = vec![Job::Index];
    for kind in generator.kinds() {
        let pages = generator.populated_pages(kind)?;
        jobs.extend((1..=pages).map(|page| Job::Page(kind, page)));
    }

    let written = jobs
        .par_iter()
        .map(|&job| {
            let xml = match job {
                Job::Index => generator.generate(INDEX_NAME, 1)?,
                Job::Page(kind, page) => generator.generate_page(kind, page)?,
            };
            write_document(output, &job.file_name(), &xml)
        })
        .collect::<Result<Vec<_>>>()?;

    log!(
        "build";
        "wrote {} to {} in {}ms",
        plural_count(written.len(), "sitemap"),
        output.display(),
        started.elapsed().as_millis()
    );
    Ok(written)
}

fn write_document(output: &Path, file_name: &str, xml: &str) -> Result<PathBuf> {
    let path = output.join(file_name);
    fs::write(&path, xml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
