use serde::{Deserialize, Serialize};

/// A submitted entry. All five fields are non-empty at creation time and the
/// record is never edited afterwards. `region` holds the display label of the
/// selected region (e.g. "São Paulo"), not its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub contact: String,
    pub region: String,
    pub city: String,
    pub neighborhood: String,
}

/// One entry of the remote region listing. Field names follow the IBGE wire
/// format (`sigla`/`nome`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionOption {
    #[serde(rename = "sigla")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
}

/// One entry of the remote sub-region (municipality) listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubRegionOption {
    #[serde(rename = "nome")]
    pub name: String,
}

/// Spreadsheet layout selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// One sheet, all records, full five-column header.
    Flat,
    /// One sheet per neighborhood, in first-seen order.
    Grouped,
}
