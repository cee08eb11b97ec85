//! Support for Android `strings.xml` locale files.
//!
//! Extraction is regex-based over the raw text (`<string name="KEY">` pairs
//! after comment stripping) — the files in the wild carry entities and stray
//! markup that a strict XML parse would reject. Writing goes through
//! `quick-xml` so generated output is always well-formed.

use lazy_static::lazy_static;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use regex::Regex;
use serde_json::{Map, Value};

use crate::{catalog::leaf_str, error::Error, normalize::normalize_value};

lazy_static! {
    static ref XML_COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref STRING_ELEMENT: Regex =
        Regex::new(r#"(?s)<string\s+name="(.+?)"[^>]*>(.*?)</string>"#).unwrap();
}

/// Extracts all `<string>` entries as a flat name → text map. Values are
/// escape-normalized; `<plurals>` and other elements are ignored.
pub fn extract(contents: &str) -> Map<String, Value> {
    let cleaned = XML_COMMENT.replace_all(contents, "");
    let mut entries = Map::new();
    for captures in STRING_ELEMENT.captures_iter(&cleaned) {
        entries.insert(
            captures[1].to_string(),
            Value::String(normalize_value(&captures[2])),
        );
    }
    entries
}

/// Serializes a flat name → text map into a `<resources>` document.
pub fn render(entries: &Map<String, Value>) -> Result<String, Error> {
    let mut out = Vec::new();
    let mut xml_writer = Writer::new(&mut out);

    xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

    xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

    for (name, value) in entries {
        let mut element = BytesStart::new("string");
        element.push_attribute(("name", name.as_str()));
        xml_writer.write_event(Event::Start(element))?;
        xml_writer.write_event(Event::Text(BytesText::new(leaf_str(value))))?;
        xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
    xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

    String::from_utf8(out).map_err(|e| Error::DataMismatch(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_basic_entries() {
        let xml = r#"
        <resources>
            <string name="hello">Hello</string>
            <string name="bye" translatable="false">Goodbye</string>
        </resources>
        "#;
        let entries = extract(xml);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("hello"), Some(&json!("Hello")));
        assert_eq!(entries.get("bye"), Some(&json!("Goodbye")));
    }

    #[test]
    fn test_extract_decodes_entities() {
        let xml = r#"<string name="quote">it&apos;s &quot;here&quot;</string>"#;
        let entries = extract(xml);
        assert_eq!(entries.get("quote"), Some(&json!(r#"it's "here""#)));
    }

    #[test]
    fn test_extract_ignores_comments_and_plurals() {
        let xml = r#"
        <resources>
            <!-- <string name="dead">nope</string> -->
            <string name="hello">Hello</string>
            <plurals name="apples">
                <item quantity="one">One apple</item>
            </plurals>
        </resources>
        "#;
        let entries = extract(xml);
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("hello"));
    }

    #[test]
    fn test_extract_multiline_value() {
        let xml = "<string name=\"multi\">line one\nline two</string>";
        let entries = extract(xml);
        assert_eq!(entries.get("multi"), Some(&json!("line one\nline two")));
    }

    #[test]
    fn test_render_round_trips() {
        let mut entries = Map::new();
        entries.insert("greet".to_string(), json!("Hi"));
        entries.insert("amp".to_string(), json!("a & b"));
        let xml = render(&entries).unwrap();
        assert!(xml.contains(r#"<string name="greet">Hi</string>"#));
        let reparsed = extract(&xml);
        assert_eq!(reparsed.get("greet"), Some(&json!("Hi")));
        assert_eq!(reparsed.get("amp"), Some(&json!("a & b")));
    }
}
