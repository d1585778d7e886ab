//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};

use crate::config::SitemapperConfig;
use crate::generator::{Generator, GeneratorOptions};
use crate::source::{Clock, Manifest, ManifestSource, SystemClock};

/// Load the content manifest named by `build.content`, with ages measured
/// from now.
pub fn load_source(config: &SitemapperConfig) -> Result<ManifestSource> {
    let manifest = Manifest::load(&config.build.content)?;
    ManifestSource::new(&manifest, config.site_url()?, SystemClock.now())
        .context("Failed to resolve content URLs")
}

/// Generator over `source` with settings from the config.
pub fn generator<'a>(
    config: &SitemapperConfig,
    source: &'a ManifestSource,
) -> Result<Generator<&'a ManifestSource, SystemClock>> {
    let options = GeneratorOptions::from_config(config)?;
    Ok(Generator::new(source, SystemClock, options))
}
