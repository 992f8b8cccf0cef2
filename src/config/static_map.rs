use crate::utils::error::{ColetorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Static local table for the third cascade level, loaded from a TOML file:
///
/// ```toml
/// [bairros]
/// "São Paulo" = ["Centro", "Liberdade"]
/// Campinas = ["Cambuí", "Taquaral"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct NeighborhoodMap {
    pub bairros: HashMap<String, Vec<String>>,
}

impl NeighborhoodMap {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ColetorError::Config {
            message: format!("invalid neighborhood table {}: {}", path.display(), e),
        })
    }
}
