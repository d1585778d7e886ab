//! `stats` command: per-kind item and page counts as JSON.

use anyhow::Result;
use serde::Serialize;

use super::common::{generator, load_source};
use crate::config::SitemapperConfig;
use crate::core::SitemapKind;

#[derive(Debug, Serialize)]
pub struct KindStats {
    pub kind: SitemapKind,
    pub items: u64,
    /// Pages listed in the index.
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct SiteStats {
    pub site_url: String,
    pub page_size: u64,
    pub kinds: Vec<KindStats>,
    pub total_items: u64,
    /// Entries in the sitemap index.
    pub total_sitemaps: u64,
}

pub fn collect_stats(config: &SitemapperConfig) -> Result<SiteStats> {
    let source = load_source(config)?;
    let generator = generator(config, &source)?;

    let kinds = generator
        .kinds()
        .map(|kind| {
            Ok(KindStats {
                kind,
                items: generator.count(kind)?,
                pages: generator.populated_pages(kind)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SiteStats {
        site_url: config.site_url()?.to_string(),
        page_size: generator.options().page_size,
        total_items: kinds.iter().map(|k| k.items).sum(),
        total_sitemaps: kinds.iter().map(|k| k.pages).sum(),
        kinds,
    })
}

pub fn print_stats(config: &SitemapperConfig, pretty: bool) -> Result<()> {
    let stats = collect_stats(config)?;
    let formatted = if pretty {
        serde_json::to_string_pretty(&stats)?
    } else {
        serde_json::to_string(&stats)?
    };
    println!("{formatted}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;

    #[test]
    fn test_collect_stats() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("content.json"),
            r#"{
                "posts": [{ "url": "/a/" }, { "url": "/b/" }, { "url": "/c/" }],
                "tags": [{ "url": "/tag/x/", "count": 0 }]
            }"#,
        )
        .unwrap();
        let mut config = test_parse_config("[sitemap]\npage_size = 2\nexclude = [\"author\"]\n");
        config.build.content = dir.path().join("content.json");

        let stats = collect_stats(&config).unwrap();
        assert_eq!(stats.kinds.len(), 4);
        assert_eq!(stats.kinds[0].kind, SitemapKind::Post);
        assert_eq!(stats.kinds[0].items, 3);
        assert_eq!(stats.kinds[0].pages, 2);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_sitemaps, 2);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["kinds"][0]["kind"], "post");
    }
}
