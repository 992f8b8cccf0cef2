//! Minimal xlsx (OOXML spreadsheet) writer: one workbook, string-only cells
//! written as inline strings, no styles and no shared-strings table. The
//! package is assembled in memory through the `zip` crate.

use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// The xlsx format caps sheet names at 31 characters.
pub const SHEET_NAME_MAX: usize = 31;

/// Fallback for names that sanitize down to nothing.
pub const DEFAULT_SHEET_NAME: &str = "Planilha";

#[derive(Debug)]
struct Worksheet {
    name: String,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet. The name is sanitized to the format's restrictions and
    /// deduplicated against previously added sheets.
    pub fn add_sheet(&mut self, name: &str, rows: Vec<Vec<String>>) {
        let name = self.unique_name(&sanitize_sheet_name(name));
        self.sheets.push(Worksheet { name, rows });
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Serializes the workbook into the bytes of an `.xlsx` file.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        tracing::debug!("Creating xlsx package with {} sheet(s)", self.sheets.len());

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())?;
        zip.write_all(self.content_types_xml().as_bytes())?;

        zip.start_file::<_, ()>("_rels/.rels", FileOptions::default())?;
        zip.write_all(ROOT_RELS_XML.as_bytes())?;

        zip.start_file::<_, ()>("xl/workbook.xml", FileOptions::default())?;
        zip.write_all(self.workbook_xml().as_bytes())?;

        zip.start_file::<_, ()>("xl/_rels/workbook.xml.rels", FileOptions::default())?;
        zip.write_all(self.workbook_rels_xml().as_bytes())?;

        for (index, sheet) in self.sheets.iter().enumerate() {
            let part = format!("xl/worksheets/sheet{}.xml", index + 1);
            zip.start_file::<_, ()>(part, FileOptions::default())?;
            zip.write_all(sheet_xml(&sheet.rows).as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Appends a numeric suffix when `base` is already taken. Sheet names
    /// compare case-insensitively in the format.
    fn unique_name(&self, base: &str) -> String {
        let taken = |candidate: &str| {
            self.sheets
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(candidate))
        };

        if !taken(base) {
            return base.to_string();
        }
        for counter in 2.. {
            let suffix = format!(" {}", counter);
            let room = SHEET_NAME_MAX - suffix.chars().count();
            let candidate = format!(
                "{}{}",
                base.chars().take(room).collect::<String>().trim_end(),
                suffix
            );
            if !taken(&candidate) {
                return candidate;
            }
        }
        unreachable!("counter is unbounded")
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        );
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        xml.push_str(
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        for index in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                index
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        xml.push_str("<sheets>");
        for (index, sheet) in self.sheets.iter().enumerate() {
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(&sheet.name),
                index + 1,
                index + 1
            ));
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for index in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                index, index
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

fn sheet_xml(rows: &[Vec<String>]) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");
    for (row_index, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
        for (col_index, value) in row.iter().enumerate() {
            xml.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_ref(col_index),
                row_index + 1,
                escape_xml(value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Spreadsheet column name for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA.
fn column_ref(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rewrites an arbitrary string into a legal sheet name: the characters the
/// format forbids become spaces, leading/trailing apostrophes go away, the
/// result is capped at 31 characters, and an empty result falls back to
/// `Planilha`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => ' ',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    let capped: String = cleaned.chars().take(SHEET_NAME_MAX).collect();
    let capped = capped.trim_end();
    if capped.is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        capped.to_string()
    }
}
