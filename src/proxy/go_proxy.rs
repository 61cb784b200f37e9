//! Go Module Proxy client
//!
//! Fetches module information from a module proxy.
//! API endpoints:
//! - List versions: {proxy}/{module}/@v/list
//! - Module file: {proxy}/{module}/@v/{version}.mod

use crate::error::RegistryError;
use crate::manifest::GoMod;
use crate::proxy::{escape_path, HttpClient, ModuleProxy, ProxyConfig};
use crate::version;
use async_trait::async_trait;
use tracing::debug;

/// Module proxy client bound to one endpoint
pub struct GoProxyClient {
    client: HttpClient,
    config: ProxyConfig,
}

impl GoProxyClient {
    /// Create a new proxy client for the configured endpoint
    pub fn new(client: HttpClient, config: ProxyConfig) -> Self {
        Self { client, config }
    }

    /// Build the URL for listing versions
    fn build_list_url(&self, module: &str) -> String {
        format!("{}/{}/@v/list", self.config.url(), escape_path(module))
    }

    /// Build the URL for a version's go.mod
    fn build_mod_url(&self, module: &str, version: &str) -> String {
        format!(
            "{}/{}/@v/{}.mod",
            self.config.url(),
            escape_path(module),
            escape_path(version)
        )
    }
}

#[async_trait]
impl ModuleProxy for GoProxyClient {
    fn endpoint(&self) -> &str {
        self.config.url()
    }

    async fn list_versions(&self, module: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_list_url(module);
        debug!("GET {}", url);
        let body = self.client.get_text(&url, module, self.endpoint()).await?;

        let mut versions: Vec<String> = body
            .lines()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        version::sort_descending(&mut versions);

        Ok(versions)
    }

    async fn fetch_mod(&self, module: &str, version: &str) -> Result<GoMod, RegistryError> {
        let url = self.build_mod_url(module, version);
        debug!("GET {}", url);
        let body = self.client.get_text(&url, module, self.endpoint()).await?;

        GoMod::parse(format!("{}@{}/go.mod", module, version), &body)
            .map_err(|e| RegistryError::invalid_response(module, self.endpoint(), e.to_string()))
    }
}
