//! Module proxy access
//!
//! This module provides:
//! - The ModuleProxy trait used by the version search
//! - Proxy endpoint configuration resolved once per process
//! - An HTTP implementation against the module proxy protocol
//! - An in-memory implementation for offline use

mod client;
mod go_proxy;
mod memory;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use go_proxy::GoProxyClient;
pub use memory::StaticProxy;

use crate::error::RegistryError;
use crate::manifest::GoMod;
use crate::package_manager::GoToolchain;
use async_trait::async_trait;
use tracing::warn;

/// Proxy used when nothing else is configured
pub const DEFAULT_PROXY: &str = "https://proxy.golang.org";

/// Source of module versions and go.mod files
#[async_trait]
pub trait ModuleProxy: Send + Sync {
    /// Base URL of the proxy
    fn endpoint(&self) -> &str;

    /// All published versions of `module`, newest first
    async fn list_versions(&self, module: &str) -> Result<Vec<String>, RegistryError>;

    /// The go.mod published for `module` at `version`
    async fn fetch_mod(&self, module: &str, version: &str) -> Result<GoMod, RegistryError>;
}

/// Proxy endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    url: String,
}

impl ProxyConfig {
    /// Use `url` as the proxy endpoint
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the endpoint from an explicit value (flag or GOPROXY), then
    /// `go env GOPROXY`, then the default proxy.
    pub fn resolve(explicit: Option<&str>, toolchain: &dyn GoToolchain) -> Self {
        let setting = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => value.to_string(),
            None => toolchain.env("GOPROXY").unwrap_or_default(),
        };
        Self::from_setting(&setting)
    }

    /// Build the configuration from a GOPROXY-style setting
    pub fn from_setting(setting: &str) -> Self {
        let first = first_proxy(setting.trim());
        match first {
            "" => Self::new(DEFAULT_PROXY),
            "direct" | "off" => {
                warn!(
                    "GOPROXY entry '{}' cannot be queried over HTTP, using {}",
                    first, DEFAULT_PROXY
                );
                Self::new(DEFAULT_PROXY)
            }
            url => Self::new(url),
        }
    }

    /// The endpoint URL without a trailing slash
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY)
    }
}

/// First entry of a GOPROXY list separated by `,` or `|`
pub fn first_proxy(setting: &str) -> &str {
    if let Some(i) = setting.find(',').filter(|&i| i > 0) {
        return &setting[..i];
    }
    if let Some(i) = setting.find('|').filter(|&i| i > 0) {
        return &setting[..i];
    }
    setting
}

/// Case-encode a module path or version for proxy URLs and cache directories
pub fn escape_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len() + 4);

    for ch in path.chars() {
        if ch.is_uppercase() {
            encoded.push('!');
            for lower in ch.to_lowercase() {
                encoded.push(lower);
            }
        } else {
            encoded.push(ch);
        }
    }

    encoded
}
