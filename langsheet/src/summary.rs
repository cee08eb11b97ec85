//! Equivalence grouping and generated-spreadsheet rows.
//!
//! Entries of the master language are clustered by an equivalence
//! signature — the normalized text of every strict-match language joined
//! into one fingerprint — so the same logical string appearing under
//! different keys (and platforms) lands in one group. Each group becomes
//! one or more spreadsheet rows: one key-slot column per platform plus one
//! column per language.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::catalog::{FlatMap, leaf_str};

/// Hard cell-size limit of the spreadsheet format.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Per-language entry maps with every platform's entries merged in,
/// language codes already alias-normalized.
pub type LangData = BTreeMap<String, FlatMap>;

/// One cluster of keys that carry the same logical string.
#[derive(Debug, Clone, Serialize)]
pub struct EquivalenceGroup {
    pub signature: String,
    /// Keys carrying this text, per platform (parallel to
    /// [`Summary::platforms`]).
    pub platform_keys: Vec<BTreeSet<String>>,
    /// Language → translation.
    pub translations: BTreeMap<String, String>,
}

/// All equivalence groups plus the column layout they were built for.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub platforms: Vec<String>,
    pub languages: Vec<String>,
    pub groups: Vec<EquivalenceGroup>,
}

impl Summary {
    /// Groups the master language's entries by equivalence signature.
    ///
    /// `key_platform` names the platform each key was collected from;
    /// `platforms` fixes the key-column order. Languages are listed strict
    /// ones first, then the remaining collected languages in sorted order.
    pub fn build(
        lang_data: &LangData,
        key_platform: &BTreeMap<String, String>,
        platforms: &[String],
        strict_langs: &[String],
        master_lang: &str,
    ) -> Self {
        let mut languages: Vec<String> = strict_langs.to_vec();
        for lang in lang_data.keys() {
            if !languages.contains(lang) {
                languages.push(lang.clone());
            }
        }

        let empty = FlatMap::new();
        let master = lang_data.get(master_lang).unwrap_or(&empty);

        let mut groups: Vec<EquivalenceGroup> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for (key, value) in master {
            let text = leaf_str(value);
            if text.trim().is_empty() {
                continue;
            }

            let signature = signature_for(key, lang_data, strict_langs);
            let index = *group_index.entry(signature.clone()).or_insert_with(|| {
                groups.push(EquivalenceGroup {
                    signature: signature.clone(),
                    platform_keys: vec![BTreeSet::new(); platforms.len()],
                    translations: languages
                        .iter()
                        .map(|lang| (lang.clone(), String::new()))
                        .collect(),
                });
                groups.len() - 1
            });
            let group = &mut groups[index];

            if let Some(platform) = key_platform.get(key) {
                if let Some(position) = platforms.iter().position(|p| p == platform) {
                    group.platform_keys[position].insert(key.clone());
                }
            }

            for lang in &languages {
                if let Some(translation) = lang_data.get(lang).and_then(|map| map.get(key)) {
                    let text = leaf_str(translation);
                    if !text.is_empty() {
                        group.translations.insert(lang.clone(), text.to_string());
                    }
                }
            }
        }

        Summary {
            platforms: platforms.to_vec(),
            languages,
            groups,
        }
    }

    /// Worksheet rows, header first. A group emits one row per key slot on
    /// its fullest platform; the language columns repeat on every slot.
    /// Groups whose keys belong to no known platform emit nothing.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::new();

        let mut header: Vec<String> = self
            .platforms
            .iter()
            .map(|platform| format!("{}-KEY", platform.to_uppercase()))
            .collect();
        header.extend(self.languages.iter().cloned());
        rows.push(header);

        for group in &self.groups {
            let key_columns: Vec<Vec<&String>> = group
                .platform_keys
                .iter()
                .map(|set| set.iter().collect())
                .collect();
            let slot_count = key_columns.iter().map(Vec::len).max().unwrap_or(0);

            for slot in 0..slot_count {
                let mut row: Vec<String> = key_columns
                    .iter()
                    .map(|keys| keys.get(slot).map(|key| (*key).clone()).unwrap_or_default())
                    .collect();
                for lang in &self.languages {
                    let translation = group
                        .translations
                        .get(lang)
                        .map(String::as_str)
                        .unwrap_or("");
                    row.push(clip_cell(translation));
                }
                rows.push(row);
            }
        }
        rows
    }
}

/// The equivalence fingerprint of one key: `lang:text` for every
/// strict-match language, joined with `|`. Absent translations contribute
/// empty text.
pub fn signature_for(key: &str, lang_data: &LangData, strict_langs: &[String]) -> String {
    strict_langs
        .iter()
        .map(|lang| {
            let text = lang_data
                .get(lang)
                .and_then(|map| map.get(key))
                .map(leaf_str)
                .unwrap_or("");
            format!("{}:{}", lang, text)
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn clip_cell(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        let clipped: String = text.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{}...", clipped)
    } else {
        text.to_string()
    }
}
