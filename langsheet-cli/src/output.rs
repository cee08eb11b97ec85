//! Locale-file and report writers.

use std::path::Path;

use langsheet::catalog::{FlatMap, split_locale_files};
use langsheet::flatten::unflatten;
use langsheet::formats::{WebDialect, web};
use langsheet::reconcile::{MissingKeyRecord, MissingTermRecord};
use serde_json::Value;

/// Writes a `locale.file.path...` catalog as per-locale web source files
/// under `out_dir/<locale>/<file><ext>`, creating directories as needed.
/// Every file writes a disjoint path, so write order is immaterial.
pub fn write_locale_files(
    catalog: &FlatMap,
    out_dir: &Path,
    dialect: WebDialect,
) -> Result<(), String> {
    for (locale, file, entries) in split_locale_files(catalog) {
        let tree = unflatten(&entries);
        let contents = web::render(&tree, dialect).map_err(|e| e.to_string())?;
        let path = out_dir
            .join(&locale)
            .join(format!("{}.{}", file, dialect.extension()));
        write_file(&path, &contents)?;
    }
    Ok(())
}

/// Writes the missing-key report: a map keyed by sheet row id, each entry
/// holding the unclaimed catalog key and its source text. Nothing is
/// written when there is nothing to report.
pub fn write_missing_keys(records: &[MissingKeyRecord], out_dir: &Path) -> Result<(), String> {
    if records.is_empty() {
        return Ok(());
    }
    let mut report = serde_json::Map::new();
    for record in records {
        let mut entry = serde_json::Map::new();
        entry.insert(record.key.clone(), Value::String(record.value.clone()));
        report.insert(record.row_id.clone(), Value::Object(entry));
    }
    write_report(&out_dir.join("missing_keys.json"), Value::Object(report))
}

/// Writes the missing-term report: a map keyed by source catalog key.
pub fn write_missing_terms(records: &[MissingTermRecord], out_dir: &Path) -> Result<(), String> {
    if records.is_empty() {
        return Ok(());
    }
    let mut report = serde_json::Map::new();
    for record in records {
        report.insert(record.key.clone(), Value::String(record.value.clone()));
    }
    write_report(&out_dir.join("missing_terms.json"), Value::Object(report))
}

fn write_report(path: &Path, value: Value) -> Result<(), String> {
    let contents = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    write_file(path, &contents)
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("directory {} not created: {}", parent.display(), e))?;
    }
    std::fs::write(path, contents)
        .map_err(|e| format!("write to {} failed: {}", path.display(), e))?;
    log::info!("{} written", path.display());
    Ok(())
}
