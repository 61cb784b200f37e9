//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - A fixed short timeout and a User-Agent
//! - Status code mapping into RegistryError
//!
//! Requests are never retried; the first failure is returned to the caller.

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Deadline for a single proxy request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("gomodtools/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper with error mapping
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Perform a GET request, mapping failures to RegistryError
    pub async fn get_with_context(
        &self,
        url: &str,
        module: &str,
        proxy: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::timeout(module, proxy)
            } else {
                RegistryError::network_error(module, proxy, e.to_string())
            }
        })?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Err(RegistryError::module_not_found(module, proxy))
            }
            status if !status.is_success() => Err(RegistryError::network_error(
                module,
                proxy,
                format!("HTTP {}", status),
            )),
            _ => Ok(response),
        }
    }

    /// Perform a GET request and return the body as text
    pub async fn get_text(
        &self,
        url: &str,
        module: &str,
        proxy: &str,
    ) -> Result<String, RegistryError> {
        let response = self.get_with_context(url, module, proxy).await?;
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::timeout(module, proxy)
            } else {
                RegistryError::invalid_response(
                    module,
                    proxy,
                    format!("failed to read response body: {}", e),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_http_client_with_config() {
        let client = HttpClient::with_config(Duration::from_secs(10), "test-agent/1.0");
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(3));
        assert!(DEFAULT_USER_AGENT.starts_with("gomodtools/"));
    }
}
