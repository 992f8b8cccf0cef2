use crate::core::cascade::{Cascade, Completion, OptionItem};
use crate::core::export;
use crate::core::form::{self, FormInput};
use crate::core::store::RecordStore;
use crate::core::table;
use crate::domain::model::{ExportMode, PersonRecord};
use crate::domain::ports::{GeoCatalog, RecordStorage};
use crate::utils::error::Result;

pub const REGION_LEVEL: usize = 0;
pub const CITY_LEVEL: usize = 1;
pub const NEIGHBORHOOD_LEVEL: usize = 2;

/// Wires the record store, the cascade and the injected catalog/storage
/// collaborators together. One instance per session; everything runs on the
/// caller's task, the only suspension points are the two catalog calls.
pub struct Session<G: GeoCatalog, S: RecordStorage> {
    catalog: G,
    storage: S,
    store: RecordStore,
    cascade: Cascade,
}

impl<G: GeoCatalog, S: RecordStorage> Session<G, S> {
    pub fn new(catalog: G, storage: S, cascade: Cascade) -> Self {
        Self {
            catalog,
            storage,
            store: RecordStore::new(),
            cascade,
        }
    }

    /// Restores the persisted snapshot and populates the region selector.
    /// Returns false when the region listing could not be fetched; the
    /// selector then stays in its default state and the caller should tell
    /// the user.
    pub async fn start(&mut self) -> Result<bool> {
        let records = self.storage.load_records().await?;
        tracing::info!("Restored {} persisted record(s)", records.len());
        self.store = RecordStore::from_records(records);
        Ok(self.load_regions().await)
    }

    /// (Re)fetches the region list. Failure is recovered locally.
    pub async fn load_regions(&mut self) -> bool {
        let ticket = self.cascade.begin_root_load();
        match self.catalog.list_regions().await {
            Ok(regions) => {
                let options = regions
                    .into_iter()
                    .map(|r| OptionItem::new(r.code, r.name))
                    .collect();
                self.cascade.complete_options(&ticket, options);
                true
            }
            Err(e) => {
                tracing::error!("Failed to load regions: {}", e);
                self.cascade.complete_failed(&ticket);
                false
            }
        }
    }

    /// Selects a region and loads its sub-region options. A fetch failure
    /// leaves the city selector in the error placeholder state instead of
    /// propagating; a late response for a superseded selection is dropped by
    /// the cascade.
    pub async fn select_region(&mut self, code: &str) -> Result<()> {
        let Some(ticket) = self.cascade.select(REGION_LEVEL, code)? else {
            return Ok(());
        };

        match self.catalog.list_sub_regions(&ticket.parent).await {
            Ok(cities) => {
                let options = cities.into_iter().map(|c| OptionItem::same(c.name)).collect();
                if self.cascade.complete_options(&ticket, options) == Completion::Discarded {
                    tracing::debug!("Discarded stale city listing for {}", ticket.parent);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load cities for {}: {}", ticket.parent, e);
                self.cascade.complete_failed(&ticket);
            }
        }
        Ok(())
    }

    /// Selects a city. The neighborhood level resolves locally (static table
    /// or free text), so no fetch is involved.
    pub fn select_city(&mut self, name: &str) -> Result<()> {
        let ticket = self.cascade.select(CITY_LEVEL, name)?;
        debug_assert!(ticket.is_none(), "neighborhood level never fetches");
        Ok(())
    }

    pub fn select_neighborhood(&mut self, name: &str) -> Result<()> {
        self.cascade.select(NEIGHBORHOOD_LEVEL, name)?;
        Ok(())
    }

    /// Submits the form. Order matters: validate, construct, append, persist.
    /// A persistence failure surfaces as an error but the record stays in the
    /// in-memory store, it is never silently dropped.
    pub async fn submit(
        &mut self,
        name: &str,
        contact: &str,
        neighborhood: Option<&str>,
    ) -> Result<PersonRecord> {
        let input = FormInput {
            name: name.to_string(),
            contact: contact.to_string(),
            region_code: self
                .cascade
                .selected_value(REGION_LEVEL)
                .unwrap_or_default()
                .to_string(),
            region_label: self
                .cascade
                .selected_label(REGION_LEVEL)
                .unwrap_or_default()
                .to_string(),
            city: self
                .cascade
                .selected_value(CITY_LEVEL)
                .unwrap_or_default()
                .to_string(),
            neighborhood: neighborhood
                .or_else(|| self.cascade.selected_value(NEIGHBORHOOD_LEVEL))
                .unwrap_or_default()
                .to_string(),
        };

        let record = form::submit(&input)?;
        self.store.append(record.clone());
        self.storage.save_records(self.store.all()).await?;
        // Input reset: the neighborhood is per-record, region and city stay
        // selected for the next entry. Rendering is pure, so the reset cannot
        // affect it.
        self.cascade.clear_selection(NEIGHBORHOOD_LEVEL);
        tracing::info!("Record added, store now holds {}", self.store.len());
        Ok(record)
    }

    /// Builds the workbook for the current store and writes it out. Returns
    /// the path of the written file.
    pub async fn export(&self, mode: ExportMode) -> Result<String> {
        let bytes = export::build_workbook(self.store.all(), mode)?;
        let path = self.storage.write_export(export::file_name(mode), &bytes).await?;
        tracing::info!("Export saved to: {}", path);
        Ok(path)
    }

    pub fn table(&self) -> String {
        table::render(self.store.all())
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn record_count(&self) -> usize {
        self.store.len()
    }
}
