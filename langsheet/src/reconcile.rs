//! The reconciliation engine.
//!
//! Given the flattened catalog of the source locale and the sheet rows, the
//! engine fans the source out to every target language, detects catalog
//! keys no application has claimed in the sheet (missing keys), and detects
//! entries whose target text never changed from the source text (missing
//! terms). All fuzzy matching runs on [`norm`]-alized text, never raw text,
//! so surrounding numbering, whitespace, and quote style are immaterial.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::{
    catalog::{FlatMap, leaf_str, strip_locale},
    error::Error,
    sheet::{SheetLayout, SheetRow, split_entry_names},
};

lazy_static! {
    static ref ORDINAL: Regex = Regex::new(r"^[0-9][.、|]").unwrap();
}

/// Normalizes text for fuzzy matching: all whitespace removed, unescaped
/// `'` unified to `"`, leading ordinal markers (`1.`, `1、`) stripped.
///
/// Idempotent: ordinal markers are stripped until none remains, so a second
/// pass finds nothing left to change.
pub fn norm(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if ch.is_whitespace() {
            continue;
        }
        if ch == '\'' && prev != Some('\\') {
            out.push('"');
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }

    loop {
        let end = match ORDINAL.find(&out) {
            Some(found) => found.end(),
            None => break,
        };
        out.drain(..end);
    }
    out
}

/// Options controlling one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// The locale whose catalog drives the scan (the sheet column compared
    /// against catalog values).
    pub source_lang: String,
    /// Locales to fan out to.
    pub target_langs: Vec<String>,
    /// Application whose entry-name column gates missing-key detection.
    pub app_name: String,
    pub find_missing_keys: bool,
    pub find_missing_terms: bool,
    /// Language probed by missing-term detection. Defaults to the first
    /// target language.
    pub untranslated_lang: Option<String>,
    /// When non-empty, only these source keys drive the sheet scan.
    pub single_keys: Vec<String>,
}

/// A catalog key matched in the sheet that no application claims yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKeyRecord {
    pub row_id: String,
    pub key: String,
    pub value: String,
}

/// A catalog key whose target text is unchanged from the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTermRecord {
    pub key: String,
    pub value: String,
}

/// Everything one reconciliation run produces.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Fanned-out catalog keyed `lang.file.path...`.
    pub target_catalog: FlatMap,
    pub missing_keys: Vec<MissingKeyRecord>,
    pub missing_terms: Vec<MissingTermRecord>,
}

/// Runs the engine over one source catalog and the sheet rows.
///
/// Per scanned key: every row whose source-language cell `norm`-equals the
/// catalog value (case-insensitively) contributes its per-language cells to
/// the target catalog, later matches overwriting earlier ones. Keys with no
/// match keep the source text as a pass-through entry.
pub fn reconcile(
    source: &FlatMap,
    rows: &[SheetRow],
    layout: &SheetLayout,
    options: &ReconcileOptions,
) -> Result<ReconcileOutcome, Error> {
    let app_column = layout.app_column(&options.app_name).ok_or_else(|| {
        Error::invalid_config(format!(
            "no sheet column for application `{}`",
            options.app_name
        ))
    })?;
    let source_column = layout.language_column(&options.source_lang).ok_or_else(|| {
        Error::invalid_config(format!(
            "no sheet column for source language `{}`",
            options.source_lang
        ))
    })?;
    let mut target_columns: Vec<(String, usize)> = Vec::new();
    for lang in &options.target_langs {
        let column = layout.language_column(lang).ok_or_else(|| {
            Error::invalid_config(format!("no sheet column for target language `{}`", lang))
        })?;
        target_columns.push((lang.clone(), column));
    }

    let scan_keys: Vec<String> = if options.single_keys.is_empty() {
        source.keys().cloned().collect()
    } else {
        options
            .single_keys
            .iter()
            .filter(|key| {
                let known = source.contains_key(key.as_str());
                if !known {
                    log::warn!("single key `{}` not found in the source catalog", key);
                }
                known
            })
            .cloned()
            .collect()
    };

    let mut outcome = ReconcileOutcome::default();

    // Pass-through seed: every scanned key starts as the source text.
    for (lang, _) in &target_columns {
        for key in &scan_keys {
            if let Some(value) = source.get(key) {
                outcome
                    .target_catalog
                    .insert(format!("{}.{}", lang, key), value.clone());
            }
        }
    }

    for key in &scan_keys {
        let Some(value) = source.get(key) else {
            continue;
        };
        let value = leaf_str(value);
        let normalized_value = norm(value).to_lowercase();

        let matches: Vec<&SheetRow> = rows
            .iter()
            .filter(|row| norm(row.cell(source_column)).to_lowercase() == normalized_value)
            .collect();

        if options.find_missing_keys && !matches.is_empty() {
            let claimed = matches
                .iter()
                .any(|row| !split_entry_names(row.cell(app_column)).is_empty());
            if !claimed {
                outcome.missing_keys.push(MissingKeyRecord {
                    row_id: matches[0].cell(layout.id).to_string(),
                    key: key.clone(),
                    value: value.to_string(),
                });
            }
        }

        for (lang, column) in &target_columns {
            for row in &matches {
                let text = row.cell(*column).trim();
                if !text.is_empty() {
                    outcome
                        .target_catalog
                        .insert(format!("{}.{}", lang, key), Value::String(text.to_string()));
                }
            }
        }
    }

    if options.find_missing_terms {
        outcome.missing_terms =
            detect_missing_terms(source, &outcome.target_catalog, options, &scan_keys);
    }

    Ok(outcome)
}

/// Flags scanned keys whose probe-language text is unchanged from the
/// source text. The probe entries are overlaid onto the source values;
/// a key whose final text still `norm`-equals the source text (this time
/// case-sensitively) was never actually translated.
fn detect_missing_terms(
    source: &FlatMap,
    target_catalog: &FlatMap,
    options: &ReconcileOptions,
    scan_keys: &[String],
) -> Vec<MissingTermRecord> {
    let Some(probe) = options
        .untranslated_lang
        .clone()
        .or_else(|| options.target_langs.first().cloned())
    else {
        return Vec::new();
    };
    let probe_entries = strip_locale(target_catalog, &probe);

    let mut records = Vec::new();
    for key in scan_keys {
        let Some(source_value) = source.get(key) else {
            continue;
        };
        let source_text = leaf_str(source_value);
        let final_text = match probe_entries.get(key) {
            Some(translated) if norm(leaf_str(translated)) != norm(source_text) => {
                leaf_str(translated).to_string()
            }
            _ => source_text.to_string(),
        };
        if norm(&final_text) == norm(source_text) {
            records.push(MissingTermRecord {
                key: key.clone(),
                value: source_text.to_string(),
            });
        }
    }
    records
}
