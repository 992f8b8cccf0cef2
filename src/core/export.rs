use crate::core::table;
use crate::core::xlsx::Workbook;
use crate::domain::model::{ExportMode, PersonRecord};
use crate::utils::error::{ColetorError, Result};

pub const FLAT_FILENAME: &str = "dados_coletados.xlsx";
pub const GROUPED_FILENAME: &str = "dados_por_bairro.xlsx";

pub const FLAT_SHEET: &str = "Dados Coletados";

/// Grouped sheets omit the region and neighborhood columns; both are implied
/// by the grouping.
pub const GROUPED_HEADER: [&str; 3] = ["Nome", "Contato", "Cidade"];

pub fn file_name(mode: ExportMode) -> &'static str {
    match mode {
        ExportMode::Flat => FLAT_FILENAME,
        ExportMode::Grouped => GROUPED_FILENAME,
    }
}

/// Builds the export workbook as `.xlsx` bytes. Exporting an empty store is
/// an error and produces no file.
pub fn build_workbook(records: &[PersonRecord], mode: ExportMode) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(ColetorError::EmptyDataset);
    }

    tracing::debug!("Exporting {} record(s), mode {:?}", records.len(), mode);

    let mut workbook = Workbook::new();
    match mode {
        ExportMode::Flat => {
            let mut rows: Vec<Vec<String>> =
                vec![table::COLUMNS.iter().map(|c| c.to_string()).collect()];
            rows.extend(records.iter().map(|r| {
                vec![
                    r.name.clone(),
                    r.contact.clone(),
                    r.region.clone(),
                    r.city.clone(),
                    r.neighborhood.clone(),
                ]
            }));
            workbook.add_sheet(FLAT_SHEET, rows);
        }
        ExportMode::Grouped => {
            for (neighborhood, members) in group_by_neighborhood(records) {
                let mut rows: Vec<Vec<String>> =
                    vec![GROUPED_HEADER.iter().map(|c| c.to_string()).collect()];
                rows.extend(members.iter().map(|r| {
                    vec![r.name.clone(), r.contact.clone(), r.city.clone()]
                }));
                workbook.add_sheet(neighborhood, rows);
            }
        }
    }

    workbook.into_bytes()
}

/// Partitions by exact neighborhood string; first-seen order determines sheet
/// order, store order is kept within each group.
fn group_by_neighborhood(records: &[PersonRecord]) -> Vec<(&str, Vec<&PersonRecord>)> {
    let mut groups: Vec<(&str, Vec<&PersonRecord>)> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|(key, _)| *key == record.neighborhood)
        {
            Some((_, members)) => members.push(record),
            None => groups.push((record.neighborhood.as_str(), vec![record])),
        }
    }
    groups
}
