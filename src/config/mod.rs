//! Configuration management for `sitemapper.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── cache      # [cache]
//! │   ├── serve      # [serve]
//! │   ├── site       # [site]
//! │   └── sitemap    # [sitemap], [sitemap.priority]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SitemapperConfig (this file)
//! ```
//!
//! The loaded config is passed by reference to whatever needs it; there is
//! no process-wide handle.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildConfig, CacheConfig, PriorityConfig, ServeConfig, SiteConfig, SitemapSectionConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::utils::path::normalize_path;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitemapper.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapperConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub sitemap: SitemapSectionConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SitemapperConfig {
    /// Load configuration for the current command.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory. Without a config file, `--site-url`
    /// (or `serve`) is enough and the current directory becomes the root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            // `serve` falls back to its own address for the site URL
            None if cli.site_url.is_some() || cli.is_serve() => Self::default(),
            None => bail!(ConfigError::Validation(format!(
                "config file `{}` not found, and no --site-url given",
                cli.config.display()
            ))),
        };

        let root = config
            .config_path
            .parent()
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        config.finalize(cli, &root);
        config.validate(cli.needs_content())?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let mut diag = ConfigDiagnostics::new();
            for field in ignored {
                diag.warn(field, "unknown field");
            }
            diag.print_warnings();
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Site URL, present once the config has been validated.
    pub fn site_url(&self) -> Result<&str> {
        self.site
            .url
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("site.url is not configured".into()).into())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn finalize(&mut self, cli: &Cli, root: &Path) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        if let Some(url) = &cli.site_url {
            self.site.url = Some(url.clone());
        }
        self.apply_command_options(cli);
        self.normalize_paths(root);
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { output, minify } => {
                Self::update_option(&mut self.build.output, output.as_ref());
                Self::update_option(&mut self.build.minify, minify.as_ref());
            }
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());

                // Local preview without a configured URL links back to this server
                if self.site.url.is_none() {
                    self.site.url = Some(self.serve.local_url());
                }
            }
            Commands::Render { .. } | Commands::Validate { .. } | Commands::Stats { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize all paths relative to root directory.
    fn normalize_paths(&mut self, root: &Path) {
        self.root = normalize_path(root);
        if !self.config_path.as_os_str().is_empty() {
            self.config_path = normalize_path(&self.config_path);
        }
        self.build.content = normalize_path(&self.root.join(&self.build.content));
        self.build.output = normalize_path(&self.root.join(&self.build.output));
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self, needs_content: bool) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.sitemap.validate(&mut diag);
        self.build.validate(needs_content, &mut diag);
        self.cache.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with the required `[site]` url.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SitemapperConfig {
    let config = format!("[site]\nurl = \"https://example.com\"\n{extra}");
    let (parsed, ignored) = SitemapperConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
