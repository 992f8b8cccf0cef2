use crate::domain::model::{PersonRecord, RegionOption, SubRegionOption};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote geography catalog. Pure request/response, no retries.
#[async_trait]
pub trait GeoCatalog: Send + Sync {
    /// Lists regions, ordered by name as returned by the upstream service.
    async fn list_regions(&self) -> Result<Vec<RegionOption>>;

    /// Lists the sub-regions (municipalities) of one region, in upstream
    /// order.
    async fn list_sub_regions(&self, region_code: &str) -> Result<Vec<SubRegionOption>>;
}

/// Durable storage for the record snapshot and for exported files.
pub trait RecordStorage: Send + Sync {
    fn load_records(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<PersonRecord>>> + Send;

    fn save_records(
        &self,
        records: &[PersonRecord],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Writes an exported file and returns the path it landed at.
    fn write_export(
        &self,
        filename: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
