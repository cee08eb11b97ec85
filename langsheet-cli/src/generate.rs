//! The `generate` command: build per-locale web files straight from the
//! sheet. Every row with a non-empty entry-name cell for the configured
//! application contributes one entry per claimed key and language.

use std::path::Path;

use langsheet::Config;
use langsheet::catalog::FlatMap;
use langsheet::sheet::{read_sheet_from_path, split_entry_names};
use serde_json::Value;

use crate::output::write_locale_files;

pub fn run(config: &Config) -> Result<(), String> {
    let dialect = config.web_dialect().map_err(|e| e.to_string())?;
    let app_column = config
        .layout
        .app_column(&config.app_name)
        .ok_or_else(|| format!("no sheet column for application `{}`", config.app_name))?;

    let mut lang_columns: Vec<(String, usize)> = Vec::new();
    for lang in &config.langs {
        let column = config
            .layout
            .language_column(lang)
            .ok_or_else(|| format!("no sheet column for language `{}`", lang))?;
        lang_columns.push((lang.to_lowercase(), column));
    }

    let rows = read_sheet_from_path(&config.sheet_path).map_err(|e| e.to_string())?;

    let mut catalog = FlatMap::new();
    for row in &rows {
        let entry_names = split_entry_names(row.cell(app_column));
        if entry_names.is_empty() {
            continue;
        }
        for (lang, column) in &lang_columns {
            for entry_name in &entry_names {
                // Slashes in entry names are path separators.
                let key = format!("{}.{}", lang, entry_name.replace('/', "."));
                catalog.insert(key, Value::String(row.cell(*column).to_string()));
            }
        }
    }

    log::info!(
        "generating {} entries across {} languages",
        catalog.len(),
        lang_columns.len()
    );
    write_locale_files(&catalog, Path::new(&config.out_dir), dialect)
}
