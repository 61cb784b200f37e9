//! In-memory module proxy
//!
//! Serves version lists and go.mod files registered up front. Every
//! `fetch_mod` call is recorded so callers can see how far a search went.

use crate::error::RegistryError;
use crate::manifest::GoMod;
use crate::proxy::ModuleProxy;
use crate::version;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

const ENDPOINT: &str = "memory://proxy";

/// Module proxy backed by maps
#[derive(Debug, Default)]
pub struct StaticProxy {
    versions: HashMap<String, Vec<String>>,
    mods: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl StaticProxy {
    /// Create an empty proxy
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `version` of `module` with the given go directive (None for no directive)
    pub fn with_version(mut self, module: &str, version: &str, go: Option<&str>) -> Self {
        let content = match go {
            Some(go) => format!("module {}\n\ngo {}\n", module, go),
            None => format!("module {}\n", module),
        };
        self.versions
            .entry(module.to_string())
            .or_default()
            .push(version.to_string());
        self.mods.insert(format!("{}@{}", module, version), content);
        self
    }

    /// List `version` without serving its go.mod
    pub fn with_listed_only(mut self, module: &str, version: &str) -> Self {
        self.versions
            .entry(module.to_string())
            .or_default()
            .push(version.to_string());
        self
    }

    /// `module@version` keys passed to `fetch_mod`, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModuleProxy for StaticProxy {
    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    async fn list_versions(&self, module: &str) -> Result<Vec<String>, RegistryError> {
        let mut versions = self
            .versions
            .get(module)
            .cloned()
            .ok_or_else(|| RegistryError::module_not_found(module, ENDPOINT))?;
        version::sort_descending(&mut versions);
        Ok(versions)
    }

    async fn fetch_mod(&self, module: &str, version: &str) -> Result<GoMod, RegistryError> {
        let key = format!("{}@{}", module, version);
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.push(key.clone());
        }

        let content = self
            .mods
            .get(&key)
            .ok_or_else(|| RegistryError::module_not_found(&key, ENDPOINT))?;
        GoMod::parse(format!("{}/go.mod", key), content)
            .map_err(|e| RegistryError::invalid_response(module, ENDPOINT, e.to_string()))
    }
}
