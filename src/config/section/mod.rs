//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitemapper.toml`:
//!
//! | Module     | TOML Section   | Purpose                               |
//! |------------|----------------|---------------------------------------|
//! | `site`     | `[site]`       | Site URL                              |
//! | `sitemap`  | `[sitemap]`    | Page size, excluded kinds, priorities |
//! | `build`    | `[build]`      | Content manifest, output, minify      |
//! | `cache`    | `[cache]`      | Document cache lifetime               |
//! | `serve`    | `[serve]`      | Sitemap server                        |

mod build;
mod cache;
mod serve;
mod site;
mod sitemap;

pub use build::BuildConfig;
pub use cache::CacheConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig;
pub use sitemap::{PriorityConfig, SitemapSectionConfig};
