//! `[serve]` section configuration.
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # "0.0.0.0" to answer on every interface
//! port = 5277
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5277;

/// Sitemap server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub interface: IpAddr,
    /// First port tried; later ones are used when it is taken.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

impl ServeConfig {
    /// Site URL of the server itself, for previews without a configured URL.
    ///
    /// IPv6 hosts are bracketed.
    pub fn local_url(&self) -> String {
        format!("http://{}", SocketAddr::new(self.interface, self.port))
    }
}
