//! PyPI JSON API adapter
//!
//! API endpoint: https://pypi.org/pypi/{package}/json, field `info.version`

use crate::domain::Manager;
use crate::error::RegistryError;
use crate::registry::{build_url, HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PyPIInfo,
}

#[derive(Debug, Deserialize)]
struct PyPIInfo {
    version: String,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_API_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn manager(&self) -> Manager {
        Manager::Pypi
    }

    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        let url = build_url(
            &self.base_url,
            &[package, "json"],
            package,
            self.registry_name(),
        )?;
        let response: PyPIResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;
        Ok(response.info.version)
    }
}
