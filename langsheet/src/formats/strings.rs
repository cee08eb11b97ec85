//! Support for Apple `.strings` locale files.
//!
//! The format is a sequence of `"KEY" = "VALUE";` pairs with C-style
//! comments. Comments are stripped before the pair regex runs; both sides
//! of each pair are escape-normalized.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{catalog::leaf_str, normalize::normalize_value};

lazy_static! {
    static ref BLOCK_COMMENT: Regex = Regex::new(r"(?s)/\*.*?\*/").unwrap();
    static ref LINE_COMMENT: Regex = Regex::new(r"//.*").unwrap();
    static ref PAIR: Regex =
        Regex::new(r#""((?:\\"|.)*?)"\s*=\s*"((?:\\"|.)*?)"\s*;"#).unwrap();
}

/// Extracts all `"key" = "value";` pairs as a flat map, comments stripped,
/// both sides escape-normalized.
pub fn extract(contents: &str) -> Map<String, Value> {
    let cleaned = BLOCK_COMMENT.replace_all(contents, "");
    let cleaned = LINE_COMMENT.replace_all(&cleaned, "");

    let mut entries = Map::new();
    for captures in PAIR.captures_iter(&cleaned) {
        entries.insert(
            normalize_value(&captures[1]),
            Value::String(normalize_value(&captures[2])),
        );
    }
    entries
}

/// Serializes a flat map into `.strings` pairs, one per line, with quotes
/// and newlines escaped.
pub fn render(entries: &Map<String, Value>) -> String {
    let mut content = String::new();
    for (key, value) in entries {
        content.push_str(&format!(
            "\"{}\" = \"{}\";\n",
            escape(key),
            escape(leaf_str(value))
        ));
    }
    content
}

fn escape(text: &str) -> String {
    text.replace('"', "\\\"").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde_json::json;

    #[test]
    fn test_extract_basic_pairs() {
        let contents = indoc! {r#"
            /* Greeting */
            "hello" = "Hello, world!";
            "bye" = "Goodbye";
        "#};
        let entries = extract(contents);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("hello"), Some(&json!("Hello, world!")));
        assert_eq!(entries.get("bye"), Some(&json!("Goodbye")));
    }

    #[test]
    fn test_extract_unescapes_quotes_and_newlines() {
        let contents = r#""quote" = "say \"hi\"\nplease";"#;
        let entries = extract(contents);
        assert_eq!(entries.get("quote"), Some(&json!("say \"hi\"\nplease")));
    }

    #[test]
    fn test_extract_strips_comments() {
        let contents = indoc! {r#"
            // "dead" = "nope";
            /* "also_dead" = "nope"; */
            "live" = "yes";
        "#};
        let entries = extract(contents);
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("live"));
    }

    #[test]
    fn test_extract_ignores_malformed_lines() {
        let contents = indoc! {r#"
            "good" = "yes";
            bad line without a pair
            "another" = "ok";
        "#};
        let entries = extract(contents);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_render_round_trips() {
        let mut entries = Map::new();
        entries.insert("greet".to_string(), json!("Hi \"there\""));
        entries.insert("multi".to_string(), json!("line one\nline two"));
        let rendered = render(&entries);
        assert!(rendered.contains(r#""greet" = "Hi \"there\"";"#));
        let reparsed = extract(&rendered);
        assert_eq!(reparsed.get("greet"), Some(&json!("Hi \"there\"")));
        assert_eq!(reparsed.get("multi"), Some(&json!("line one\nline two")));
    }
}
