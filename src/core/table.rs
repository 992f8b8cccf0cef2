use crate::domain::model::PersonRecord;

/// Column labels, shared with the flat export layout.
pub const COLUMNS: [&str; 5] = ["Nome", "Contato", "Estado", "Cidade", "Bairro"];

/// Renders the whole table from scratch, one row per record in store order.
/// Pure function of the record slice; called after every store mutation and
/// once at startup with the restored snapshot.
pub fn render(records: &[PersonRecord]) -> String {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    let rows: Vec<[&str; 5]> = records
        .iter()
        .map(|r| {
            [
                r.name.as_str(),
                r.contact.as_str(),
                r.region.as_str(),
                r.city.as_str(),
                r.neighborhood.as_str(),
            ]
        })
        .collect();

    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(&COLUMNS, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_row(
        &rule.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        &widths,
    ));
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:width$}", cell, width = width))
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}
