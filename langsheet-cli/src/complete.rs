//! The `complete` command: fan the base locale out to the configured
//! target languages, writing the completed locale files plus the
//! missing-key and missing-term reports.

use std::path::Path;

use langsheet::catalog::{FlatMap, merge};
use langsheet::flatten::flatten_with_prefix;
use langsheet::formats::{WebDialect, web};
use langsheet::reconcile::{ReconcileOptions, reconcile};
use langsheet::Config;
use langsheet::sheet::read_sheet_from_path;

use crate::collect::{LocaleFile, read_locale_dir};
use crate::output::{write_locale_files, write_missing_keys, write_missing_terms};

pub async fn run(config: &Config) -> Result<(), String> {
    let dialect = config.web_dialect().map_err(|e| e.to_string())?;
    let base_lang = &config.complete_base_lang;
    let base_dir = config.locale_dir(base_lang);

    let mut files = read_locale_dir(&base_dir, &config.file_type).await?;
    if !config.single_file.is_empty() {
        files.retain(|file| file.name == config.single_file);
        if files.is_empty() {
            return Err(format!(
                "single file `{}` not found in {}",
                config.single_file,
                base_dir.display()
            ));
        }
    }

    let source = parse_locale_files(&files, dialect, None);
    if source.is_empty() {
        return Err(format!(
            "no entries parsed from {}; nothing to complete",
            base_dir.display()
        ));
    }

    let rows = read_sheet_from_path(&config.sheet_path).map_err(|e| e.to_string())?;

    let options = ReconcileOptions {
        source_lang: base_lang.clone(),
        target_langs: config.complete_langs.clone(),
        app_name: config.app_name.clone(),
        find_missing_keys: config.find_missing_keys,
        find_missing_terms: config.find_missing_terms,
        untranslated_lang: config.untranslated_lang.clone(),
        single_keys: config.single_keys.clone(),
    };

    // In single-keys mode the untouched entries come from the existing
    // target-locale files; everything else is recomputed from scratch.
    let mut target_catalog = if options.single_keys.is_empty() {
        FlatMap::new()
    } else {
        read_existing_targets(config, dialect, &files).await
    };

    let outcome =
        reconcile(&source, &rows, &config.layout, &options).map_err(|e| e.to_string())?;
    merge(&mut target_catalog, outcome.target_catalog.clone());

    let out_dir = Path::new(&config.out_dir);
    write_locale_files(&target_catalog, out_dir, dialect)?;
    write_missing_keys(&outcome.missing_keys, out_dir)?;
    write_missing_terms(&outcome.missing_terms, out_dir)?;

    log::info!(
        "completed {} languages from {} source entries ({} missing keys, {} missing terms)",
        config.complete_langs.len(),
        source.len(),
        outcome.missing_keys.len(),
        outcome.missing_terms.len()
    );
    Ok(())
}

/// Parses and flattens locale files into one catalog, keys scoped by file
/// stem (and a locale prefix when given). Files that fail to parse are
/// logged and skipped; the rest of the run proceeds.
fn parse_locale_files(files: &[LocaleFile], dialect: WebDialect, locale: Option<&str>) -> FlatMap {
    let mut catalog = FlatMap::new();
    for file in files {
        match web::extract_tree(&file.contents, dialect) {
            Ok(tree) => {
                let stem = file_stem(&file.name);
                let prefix = match locale {
                    Some(locale) => format!("{}.{}", locale, stem),
                    None => stem.to_string(),
                };
                merge(&mut catalog, flatten_with_prefix(&tree, &prefix));
            }
            Err(error) => {
                log::warn!("[{}] parse skipped: {}", file.name, error);
            }
        }
    }
    catalog
}

/// Reads back the current target-locale files (restricted to the same file
/// set as the base locale) as the starting catalog for single-keys runs.
async fn read_existing_targets(
    config: &Config,
    dialect: WebDialect,
    base_files: &[LocaleFile],
) -> FlatMap {
    let mut seed = FlatMap::new();
    for lang in &config.complete_langs {
        let dir = config.locale_dir(lang);
        let existing = match read_locale_dir(&dir, &config.file_type).await {
            Ok(files) => files,
            Err(error) => {
                log::warn!("{}", error);
                continue;
            }
        };
        let matching: Vec<LocaleFile> = existing
            .into_iter()
            .filter(|file| base_files.iter().any(|base| base.name == file.name))
            .collect();
        merge(&mut seed, parse_locale_files(&matching, dialect, Some(lang)));
    }
    seed
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("home.ts"), "home");
        assert_eq!(file_stem("home.js"), "home");
        assert_eq!(file_stem("noext"), "noext");
    }

    #[test]
    fn test_parse_locale_files_skips_broken_files() {
        let files = vec![
            LocaleFile {
                name: "good.js".to_string(),
                contents: "module.exports = { title: '欢迎' }".to_string(),
            },
            LocaleFile {
                name: "broken.js".to_string(),
                contents: "module.exports = { title: \"open }".to_string(),
            },
        ];
        let catalog = parse_locale_files(&files, WebDialect::Js, None);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains_key("good.title"));
    }

    #[test]
    fn test_parse_locale_files_with_locale_prefix() {
        let files = vec![LocaleFile {
            name: "home.js".to_string(),
            contents: "module.exports = { title: 'Welcome' }".to_string(),
        }];
        let catalog = parse_locale_files(&files, WebDialect::Js, Some("en"));
        assert!(catalog.contains_key("en.home.title"));
    }
}
