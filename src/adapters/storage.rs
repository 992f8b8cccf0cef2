use crate::domain::model::PersonRecord;
use crate::domain::ports::RecordStorage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the record snapshot inside the data directory. Carried over
/// from the original deployment's storage key.
pub const RECORDS_FILE: &str = "coletor_dados_pessoas.json";

/// Filesystem-backed storage: the record snapshot and the exported workbooks
/// all live under one base directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn records_path(&self) -> PathBuf {
        self.base_path.join(RECORDS_FILE)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

impl RecordStorage for JsonFileStorage {
    /// Missing snapshot means a fresh store; a corrupt one is discarded with
    /// a warning rather than failing startup.
    async fn load_records(&self) -> Result<Vec<PersonRecord>> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let data = fs::read(&path)?;
        match serde_json::from_slice(&data) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!("Ignoring corrupt snapshot {}: {}", path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    async fn save_records(&self, records: &[PersonRecord]) -> Result<()> {
        let data = serde_json::to_vec_pretty(records)?;
        tracing::debug!("Persisting {} record(s) ({} bytes)", records.len(), data.len());
        self.write_file(&self.records_path(), &data)
    }

    async fn write_export(&self, filename: &str, data: &[u8]) -> Result<String> {
        let path = self.base_path.join(filename);
        tracing::debug!("Writing export ({} bytes) to {}", data.len(), path.display());
        self.write_file(&path, data)?;
        Ok(path.display().to_string())
    }
}
