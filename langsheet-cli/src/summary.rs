//! The `summary` command: merge every platform's locale files into one
//! equivalence-grouped sheet.

use std::collections::BTreeMap;
use std::path::Path;

use langsheet::Config;
use langsheet::catalog::leaf_str;
use langsheet::formats::FormatKind;
use langsheet::normalize::{mask_variables, normalize_value};
use langsheet::sheet::write_rows_to_path;
use langsheet::summary::{LangData, Summary};
use serde_json::Value;

use crate::collect::collect_platform_files;

pub async fn run(
    config: &Config,
    base_dir: Option<String>,
    output: Option<String>,
) -> Result<(), String> {
    let base = base_dir.unwrap_or_else(|| config.summary.base_dir.clone());
    let output = output.unwrap_or_else(|| config.summary.output_file.clone());

    let files = collect_platform_files(Path::new(&base), &config.summary.platforms).await;
    if files.is_empty() {
        return Err(format!("no locale files found under {}", base));
    }

    let mut lang_data = LangData::new();
    let mut key_platform: BTreeMap<String, String> = BTreeMap::new();

    for file in &files {
        let extension = Path::new(&file.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let kind = match file.kind.format_for(extension) {
            Ok(kind) => kind,
            Err(error) => {
                log::warn!("[{}] skipped: {}", file.path.display(), error);
                continue;
            }
        };
        let entries = match kind.extract(&file.contents) {
            Ok(entries) => entries,
            Err(error) => {
                log::warn!("[{}] parse skipped: {}", file.path.display(), error);
                continue;
            }
        };

        let is_web = matches!(kind, FormatKind::Web(_));
        let stem = Path::new(&file.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&file.name)
            .to_string();
        let lang = config.normalize_lang(&file.lang);
        let lang_entries = lang_data.entry(lang).or_default();

        for (key, value) in entries {
            // Web keys are scoped by file stem; every value is masked so
            // the same text carrying different placeholder spellings still
            // groups together.
            let key = if is_web {
                format!("{}.{}", stem, key)
            } else {
                key
            };
            let text = if is_web {
                normalize_value(leaf_str(&value))
            } else {
                leaf_str(&value).to_string()
            };
            let text = mask_variables(&text);
            key_platform.insert(key.clone(), file.platform.clone());
            lang_entries.insert(key, Value::String(text));
        }
    }

    let platforms: Vec<String> = config
        .summary
        .platforms
        .iter()
        .map(|platform| platform.name.clone())
        .collect();
    let summary = Summary::build(
        &lang_data,
        &key_platform,
        &platforms,
        &config.summary.strict_match_languages,
        &config.summary.master_language,
    );
    let rows = summary.to_rows();
    write_rows_to_path(&output, &rows).map_err(|e| e.to_string())?;

    log::info!(
        "{} groups across {} languages written to {}",
        summary.groups.len(),
        summary.languages.len(),
        output
    );
    Ok(())
}
