//! npm Registry adapter
//!
//! Fetches the latest published version from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}, field `dist-tags.latest`

use crate::domain::Manager;
use crate::error::RegistryError;
use crate::registry::{build_url, HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// npm registry base URL
const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response (only the fields we read)
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: DistTags,
}

#[derive(Debug, Default, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

impl NpmAdapter {
    /// Create a new npm adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create an adapter pointed at another registry
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn manager(&self) -> Manager {
        Manager::Npm
    }

    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        let url = build_url(&self.base_url, &[package], package, self.registry_name())?;
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        response.dist_tags.latest.ok_or_else(|| {
            RegistryError::invalid_response(package, self.registry_name(), "missing dist-tags.latest")
        })
    }
}
