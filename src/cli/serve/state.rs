//! Shared state of a running server.

use crate::cache::{DocumentCache, document_key};
use crate::cli::common::load_source;
use crate::config::SitemapperConfig;
use crate::core::SitemapResult;
use crate::generator::{Generator, GeneratorOptions};
use crate::source::{Clock, ManifestSource, SystemClock};
use crate::utils::hash::{ContentHash, hash_file};
use crate::{debug, log};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// Current records, numbered so renders from replaced records can be told apart.
struct Loaded {
    generation: u64,
    source: ManifestSource,
}

pub struct SiteState {
    config: SitemapperConfig,
    options: GeneratorOptions,
    loaded: RwLock<Loaded>,
    cache: DocumentCache,
}

impl SiteState {
    /// Load the manifest and record its fingerprint.
    pub fn load(config: SitemapperConfig) -> Result<Self> {
        let options = GeneratorOptions::from_config(&config)?;
        let source = load_source(&config)?;
        let cache = DocumentCache::new(config.cache.ttl());
        cache.maybe_regenerate(Self::fingerprint(&config)?);

        Ok(Self {
            config,
            options,
            loaded: RwLock::new(Loaded {
                generation: 0,
                source,
            }),
            cache,
        })
    }

    pub fn config(&self) -> &SitemapperConfig {
        &self.config
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    fn fingerprint(config: &SitemapperConfig) -> Result<ContentHash> {
        let path = &config.build.content;
        hash_file(path).with_context(|| format!("Failed to read content manifest {}", path.display()))
    }

    /// Reload the manifest if its content changed since the last check.
    ///
    /// A manifest that fails to load leaves the previous content in place.
    pub fn refresh(&self) -> Result<()> {
        let hash = Self::fingerprint(&self.config)?;
        if !self.cache.maybe_regenerate(hash) {
            return Ok(());
        }

        let source = load_source(&self.config)?;
        let mut loaded = self.loaded.write();
        loaded.source = source;
        loaded.generation += 1;
        // Cleared under the write lock: stores from older generations either
        // land before this or are refused afterwards.
        self.cache.clear_all();
        drop(loaded);

        log!("serve"; "content changed, reloaded {}", self.config.build.content.display());
        Ok(())
    }

    /// Generator over the current records, aged from now, with their generation.
    fn snapshot(&self) -> (u64, Generator<ManifestSource, SystemClock>) {
        let loaded = self.loaded.read();
        let source = loaded.source.clone().at(SystemClock.now());
        let generator = Generator::new(source, SystemClock, self.options.clone());
        (loaded.generation, generator)
    }

    /// Cache a document rendered at `generation`, unless the records have
    /// been replaced since. Returns whether it was stored.
    fn store_if_current(&self, generation: u64, key: &str, document: &Arc<str>) -> bool {
        let loaded = self.loaded.read();
        if loaded.generation != generation {
            debug!("cache"; "dropping {} rendered from replaced content", key);
            return false;
        }
        self.cache.store(key, Arc::clone(document));
        true
    }

    /// Rendered document for a type name and page, cached when enabled.
    pub fn document(&self, name: &str, page: u64) -> SitemapResult<Arc<str>> {
        let key = document_key(name, page);
        let caching = self.config.cache.enable;

        if caching && let Some(document) = self.cache.fresh(&key) {
            debug!("cache"; "hit {}", key);
            return Ok(document);
        }

        let (generation, generator) = self.snapshot();
        let document: Arc<str> = generator.generate(name, page)?.into();
        if caching {
            self.store_if_current(generation, &key, &document);
        }
        Ok(document)
    }
}
