//! The translation sheet: rows, the fixed column layout, and CSV transport.
//!
//! The sheet itself lives in a spreadsheet maintained by translators; this
//! crate consumes and produces its CSV export form. Column meanings are
//! positional and configured as data: fixed property columns (`id`,
//! `issue`, `isHas`), one column per language, and one entry-name column
//! per application (a comma-separated key list per cell).

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// One sheet row: its cells in column order. Reading a cell past the row's
/// end yields the empty string, matching sparse spreadsheet exports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetRow {
    pub cells: Vec<String>,
}

impl SheetRow {
    pub fn new(cells: Vec<String>) -> Self {
        SheetRow { cells }
    }

    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// The fixed column roles of the translation sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub id: usize,
    pub issue: usize,
    pub is_has: usize,
    /// Language code → column index of its text block.
    pub languages: BTreeMap<String, usize>,
    /// Application name → column index of its entry-name block.
    pub apps: BTreeMap<String, usize>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        let languages = [
            ("zh", 11),
            ("cn", 11),
            ("en", 12),
            ("hk", 13),
            ("tc", 13),
            ("kr", 14),
            ("ru", 15),
            ("es", 16),
            ("pt", 17),
            ("fa", 18),
            ("jp", 19),
            ("ja", 19),
            ("tr", 20),
        ]
        .into_iter()
        .map(|(lang, index)| (lang.to_string(), index))
        .collect();

        let apps = [("WEBUC", 6), ("WEBCO", 7), ("H5WAP", 8), ("H5APP", 9)]
            .into_iter()
            .map(|(app, index)| (app.to_string(), index))
            .collect();

        SheetLayout {
            id: 0,
            issue: 1,
            is_has: 2,
            languages,
            apps,
        }
    }
}

impl SheetLayout {
    pub fn language_column(&self, lang: &str) -> Option<usize> {
        self.languages.get(lang).copied()
    }

    pub fn app_column(&self, app: &str) -> Option<usize> {
        self.apps.get(app).copied()
    }
}

/// Reads sheet rows from CSV, discarding the header row.
pub fn read_sheet<R: Read>(reader: R) -> Result<Vec<SheetRow>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(SheetRow::new(
            record.iter().map(str::to_string).collect(),
        ));
    }
    if !rows.is_empty() {
        rows.remove(0);
    }
    Ok(rows)
}

/// Reads sheet rows from a CSV file; a missing file is a fatal error.
pub fn read_sheet_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SheetRow>, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::missing_input(format!(
            "sheet file {} does not exist",
            path.display()
        )));
    }
    let file = std::fs::File::open(path)?;
    read_sheet(std::io::BufReader::new(file))
}

/// Writes rows (header included) as CSV.
pub fn write_rows<W: Write>(writer: W, rows: &[Vec<String>]) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes rows as a CSV file, creating parent directories.
pub fn write_rows_to_path<P: AsRef<Path>>(path: P, rows: &[Vec<String>]) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_rows(std::io::BufWriter::new(file), rows)
}

/// Splits an entry-name cell into its keys: whitespace around commas is
/// collapsed, empty cells yield no keys.
pub fn split_entry_names(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
