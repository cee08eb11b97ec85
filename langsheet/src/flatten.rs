//! Bidirectional mapping between a nested tree and a flat dot-path map.
//!
//! `flatten` joins object keys with `.` and array elements with their decimal
//! index (`path.0`, `path.1`, ...). `unflatten` is the inverse: a child
//! segment that is a pure decimal integer makes the parent container a
//! sequence, with values appended in key order. For any tree the loose
//! parser produces, `unflatten(flatten(t)) == t` as long as key order is
//! stable — which the insertion-ordered map guarantees.

use serde_json::{Map, Value};

/// Flattens a tree into a dot-path map. Leaves keep their `Value` as-is
/// (always strings for parser-produced trees); empty containers contribute
/// no entries.
pub fn flatten(tree: &Value) -> Map<String, Value> {
    flatten_with_prefix(tree, "")
}

/// Flattens a tree with every path prepended by `prefix` (used to scope a
/// file's entries under its file name, or a locale's under its code).
pub fn flatten_with_prefix(tree: &Value, prefix: &str) -> Map<String, Value> {
    let mut result = Map::new();
    flatten_into(tree, prefix, &mut result);
    result
}

fn flatten_into(node: &Value, prefix: &str, out: &mut Map<String, Value>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, &join_path(prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &join_path(prefix, &index.to_string()), out);
            }
        }
        leaf => {
            out.insert(prefix.to_string(), leaf.clone());
        }
    }
}

/// Joins a path prefix and a segment with `.`; an empty prefix yields the
/// bare segment.
pub fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Rebuilds the nested tree from a flat dot-path map.
pub fn unflatten(flat: &Map<String, Value>) -> Value {
    let entries: Vec<(Vec<&str>, &Value)> = flat
        .iter()
        .map(|(key, value)| (key.split('.').collect(), value))
        .collect();
    build(entries)
}

fn build(entries: Vec<(Vec<&str>, &Value)>) -> Value {
    let array_like = entries
        .first()
        .map(|(path, _)| is_decimal(path[0]))
        .unwrap_or(false);

    // Group by head segment, preserving first-seen order.
    let mut groups: Vec<(&str, Vec<(Vec<&str>, &Value)>)> = Vec::new();
    for (path, value) in entries {
        let head = path[0];
        let rest: Vec<&str> = path[1..].to_vec();
        match groups.iter_mut().find(|(h, _)| *h == head) {
            Some((_, items)) => items.push((rest, value)),
            None => groups.push((head, vec![(rest, value)])),
        }
    }

    if array_like {
        Value::Array(groups.into_iter().map(|(_, items)| build_child(items)).collect())
    } else {
        let mut map = Map::new();
        for (head, items) in groups {
            map.insert(head.to_string(), build_child(items));
        }
        Value::Object(map)
    }
}

fn build_child(items: Vec<(Vec<&str>, &Value)>) -> Value {
    if items.len() == 1 && items[0].0.is_empty() {
        return items[0].1.clone();
    }
    let nested: Vec<(Vec<&str>, &Value)> = items
        .into_iter()
        .filter(|(path, _)| !path.is_empty())
        .collect();
    build(nested)
}

fn is_decimal(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
