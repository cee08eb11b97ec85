//! Catalog types and helpers.
//!
//! A catalog is a flat dot-path map. Per-file maps are scoped by file name
//! (`file.path...`), per-locale catalogs additionally by locale
//! (`locale.file.path...`). Merging is last-write-wins in merge order,
//! which is deterministic because callers enumerate files in a fixed order.

use serde_json::{Map, Value};

/// Flat dot-path → text map. Values are always `Value::String` for maps
/// built by this crate; insertion order is preserved.
pub type FlatMap = Map<String, Value>;

/// The text of a leaf value. Non-string values (which this crate never
/// produces) read as empty.
pub fn leaf_str(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

/// Merges `from` into `into`; duplicate keys take the incoming value.
pub fn merge(into: &mut FlatMap, from: FlatMap) {
    for (key, value) in from {
        into.insert(key, value);
    }
}

/// Returns a copy of `map` with every key prefixed (`prefix.key`).
pub fn prefix_keys(map: &FlatMap, prefix: &str) -> FlatMap {
    let mut out = FlatMap::new();
    for (key, value) in map {
        out.insert(format!("{}.{}", prefix, key), value.clone());
    }
    out
}

/// Extracts the sub-catalog of one locale, with the `locale.` prefix
/// removed from each key.
pub fn strip_locale(catalog: &FlatMap, locale: &str) -> FlatMap {
    let prefix = format!("{}.", locale);
    let mut out = FlatMap::new();
    for (key, value) in catalog {
        if let Some(rest) = key.strip_prefix(&prefix) {
            out.insert(rest.to_string(), value.clone());
        }
    }
    out
}

/// Splits a `locale.file.path...` catalog into per-locale, per-file flat
/// maps, in first-seen order. Keys without both scopes are skipped with a
/// warning — a file-level leaf has no addressable output location.
pub fn split_locale_files(catalog: &FlatMap) -> Vec<(String, String, FlatMap)> {
    let mut out: Vec<(String, String, FlatMap)> = Vec::new();
    for (key, value) in catalog {
        let mut parts = key.splitn(3, '.');
        let (Some(locale), Some(file), Some(rest)) = (parts.next(), parts.next(), parts.next())
        else {
            log::warn!("catalog key `{}` has no locale.file prefix, skipping", key);
            continue;
        };
        match out
            .iter_mut()
            .find(|(l, f, _)| l == locale && f == file)
        {
            Some((_, _, entries)) => {
                entries.insert(rest.to_string(), value.clone());
            }
            None => {
                let mut entries = FlatMap::new();
                entries.insert(rest.to_string(), value.clone());
                out.push((locale.to_string(), file.to_string(), entries));
            }
        }
    }
    out
}
