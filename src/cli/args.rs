//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::{net::IpAddr, path::PathBuf};

/// Paginated XML sitemap generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitemapper.toml)
    #[arg(short = 'C', long, global = true, default_value = "sitemapper.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Content manifest path (relative to project root)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub content: Option<PathBuf>,

    /// Override site URL.
    ///
    /// Useful when the deployed URL differs from the one in sitemapper.toml.
    #[arg(short = 'U', long = "site-url", global = true, value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write the sitemap index and every sitemap page to the output directory
    #[command(visible_alias = "b")]
    Build {
        /// Output directory path (relative to project root)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Minify the XML output
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Print one sitemap document to stdout
    #[command(visible_alias = "r")]
    Render {
        /// Document name: `index` or a sitemap kind (post, page, category, tag, author)
        #[arg(default_value = "index")]
        name: String,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },

    /// Check sitemap files for structural problems
    #[command(visible_alias = "v")]
    Validate {
        /// Sitemap files to check
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,

        /// Exit successfully even when errors are found
        #[arg(long, short = 'w')]
        warn_only: bool,
    },

    /// Print per-kind item and page counts as JSON
    Stats {
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Serve sitemaps over HTTP, rendered on demand
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Commands that read the content manifest.
    pub const fn needs_content(&self) -> bool {
        !matches!(self.command, Commands::Validate { .. })
    }

    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
