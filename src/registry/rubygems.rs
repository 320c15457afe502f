//! RubyGems registry adapter
//!
//! API endpoint: https://rubygems.org/api/v1/gems/{gem}.json, field `version`

use crate::domain::Manager;
use crate::error::RegistryError;
use crate::registry::{build_url, HttpClient, RegistryAdapter};
use async_trait::async_trait;
use serde::Deserialize;

/// RubyGems registry base URL
const RUBYGEMS_API_URL: &str = "https://rubygems.org/api/v1/gems";

/// RubyGems adapter
pub struct RubyGemsAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GemResponse {
    version: String,
}

impl RubyGemsAdapter {
    /// Create a new RubyGems adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, RUBYGEMS_API_URL)
    }

    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryAdapter for RubyGemsAdapter {
    fn manager(&self) -> Manager {
        Manager::Rubygems
    }

    fn registry_name(&self) -> &'static str {
        "RubyGems"
    }

    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError> {
        let file = format!("{package}.json");
        let url = build_url(&self.base_url, &[file.as_str()], package, self.registry_name())?;
        let response: GemResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;
        Ok(response.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::client::tests::{http_response, serve};

    #[test]
    fn test_rubygems_adapter_manager() {
        let adapter = RubyGemsAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.manager(), Manager::Rubygems);
        assert_eq!(adapter.registry_name(), "RubyGems");
    }

    #[tokio::test]
    async fn test_fetch_latest_from_local_registry() {
        let (base, _) = serve(vec![http_response(
            "200 OK",
            "",
            r#"{"name":"rails","version":"7.1.3","downloads":1}"#,
        )])
        .await;

        let adapter = RubyGemsAdapter::with_base_url(HttpClient::new().unwrap(), base);
        assert_eq!(adapter.fetch_latest("rails").await.unwrap(), "7.1.3");
    }
}
