use crate::domain::model::{RegionOption, SubRegionOption};
use crate::domain::ports::GeoCatalog;
use crate::utils::error::{ColetorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Public IBGE "localidades" catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// Catalog client. Plain request/response: no retries, no auth, no
/// pagination.
#[derive(Debug, Clone)]
pub struct IbgeCatalog {
    base_url: String,
    client: Client,
}

impl IbgeCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!("Making catalog request to: {}", url);
        let response = self.client.get(&url).send().await?;

        tracing::debug!("Catalog response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ColetorError::UpstreamStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GeoCatalog for IbgeCatalog {
    async fn list_regions(&self) -> Result<Vec<RegionOption>> {
        // Upstream sorts for us.
        self.get_json(format!("{}/estados?orderBy=nome", self.base_url))
            .await
    }

    async fn list_sub_regions(&self, region_code: &str) -> Result<Vec<SubRegionOption>> {
        self.get_json(format!("{}/estados/{}/municipios", self.base_url, region_code))
            .await
    }
}
