//! Sitemapper - paginated XML sitemaps for a site's posts, pages and archives.

mod cache;
mod cli;
mod config;
mod core;
mod generator;
mod logger;
mod source;
mod utils;
mod validate;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SitemapperConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    // Checking files needs no project
    if let Commands::Validate { files, warn_only } = &cli.command {
        logger::set_verbose(cli.verbose);
        return cli::validate::validate_files(files, *warn_only);
    }

    let config = SitemapperConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_sitemaps(&config).map(|_| ()),
        Commands::Render { name, page } => cli::render::render(&config, name, *page),
        Commands::Stats { pretty } => cli::stats::print_stats(&config, *pretty),
        Commands::Serve { .. } => cli::serve::serve(config),
        Commands::Validate { .. } => Ok(()),
    }
}
