//! `render` command: print one sitemap document to stdout.

use std::io::{self, Write};

use anyhow::Result;

use super::common::{generator, load_source};
use crate::config::SitemapperConfig;

/// Render `name` (`index` or a kind) at `page`.
pub fn render_document(config: &SitemapperConfig, name: &str, page: u64) -> Result<String> {
    let source = load_source(config)?;
    let generator = generator(config, &source)?;
    Ok(generator.generate(name, page)?)
}

pub fn render(config: &SitemapperConfig, name: &str, page: u64) -> Result<()> {
    let xml = render_document(config, name, page)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(xml.as_bytes())?;
    if !xml.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
