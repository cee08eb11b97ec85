//! Loose object-literal parser.
//!
//! Turns syntactically relaxed, JS-like key/value source text (mixed quote
//! styles, unquoted keys, nested braces and brackets, trailing commas) into a
//! [`serde_json::Value`] tree. Only strings, arrays, and objects are ever
//! produced: bare literals such as `1` or `true` are kept as strings, which
//! mirrors the source convention of quoting every real value.
//!
//! The whole source body of one file is parsed in a single pass with an
//! explicit byte cursor; there is no backtracking and no recovery — malformed
//! input (unbalanced quotes or braces, a key without `:`) fails the file with
//! [`Error::LiteralSyntax`].

use serde_json::{Map, Value};

use crate::error::Error;

/// Scanner state: between tokens, or inside a string literal opened by the
/// recorded quote byte. Braces, brackets, and commas are inert inside a
/// string; a quote only closes the string when not preceded by a backslash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InString(u8),
}

/// Byte cursor over one object interior. All structural characters are
/// ASCII, so byte offsets always land on UTF-8 boundaries.
struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Skips the run of commas and whitespace that separates entries.
    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos] == b',' || self.bytes[self.pos].is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    /// Consumes up to and including the next unescaped `:` and returns the
    /// cleaned key (trimmed, one layer of surrounding quotes stripped).
    fn scan_key(&mut self) -> Result<String, Error> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b':'
                && (self.pos == start || self.bytes[self.pos - 1] != b'\\')
            {
                let raw = &self.src[start..self.pos];
                self.pos += 1;
                return Ok(strip_key_quotes(raw.trim()));
            }
            self.pos += 1;
        }
        Err(Error::literal_syntax(start, "expected `:` after key"))
    }

    /// Consumes one raw value: everything up to a top-level `,`, or up to an
    /// enclosing `}`/`]` (which is left unconsumed for the caller).
    fn scan_value(&mut self) -> Result<&'a str, Error> {
        let start = self.pos;
        let mut state = ScanState::Normal;
        let mut depth: i32 = 0;

        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let escaped = self.pos > start && self.bytes[self.pos - 1] == b'\\';

            match state {
                ScanState::Normal => {
                    if (b == b'"' || b == b'\'' || b == b'`') && !escaped {
                        state = ScanState::InString(b);
                    } else if b == b'{' || b == b'[' {
                        depth += 1;
                    } else if b == b'}' || b == b']' {
                        depth -= 1;
                        if depth < 0 {
                            break;
                        }
                    } else if b == b',' && depth == 0 {
                        break;
                    }
                }
                ScanState::InString(quote) => {
                    if b == quote && !escaped {
                        state = ScanState::Normal;
                    }
                }
            }
            self.pos += 1;
        }

        if let ScanState::InString(_) = state {
            return Err(Error::literal_syntax(start, "unterminated string literal"));
        }
        Ok(&self.src[start..self.pos])
    }
}

/// Parses a full object literal, outer braces included.
///
/// Trims the input, verifies the `{ ... }` delimiters, and parses the
/// interior with [`parse_body`].
pub fn parse_braced(text: &str) -> Result<Value, Error> {
    let t = text.trim();
    if !t.starts_with('{') {
        return Err(Error::literal_syntax(0, "expected `{` to open object"));
    }
    let inner = strip_delimiters(t, '}')
        .ok_or_else(|| Error::literal_syntax(t.len(), "expected `}` to close object"))?;
    parse_body(inner)
}

/// Parses the interior of an object literal (the text between the outermost
/// `{` and `}`, braces already stripped). Empty or whitespace-only input is
/// the empty object.
pub fn parse_body(body: &str) -> Result<Value, Error> {
    let mut cursor = Cursor::new(body);
    let mut object = Map::new();

    loop {
        cursor.skip_whitespace();
        if cursor.at_end() {
            break;
        }
        let key = cursor.scan_key()?;
        cursor.skip_whitespace();
        let offset = cursor.pos;
        let raw = cursor.scan_value()?;
        let value = classify_value(raw, offset)?;
        object.insert(key, value);
        cursor.skip_separators();
    }

    Ok(Value::Object(object))
}

/// Classifies one raw value substring by its leading character and converts
/// it into a tree node.
fn classify_value(raw: &str, offset: usize) -> Result<Value, Error> {
    let t = raw.trim();

    if t.starts_with('{') {
        let inner = strip_delimiters(t, '}')
            .ok_or_else(|| Error::literal_syntax(offset, "unbalanced `{` in value"))?;
        parse_body(inner)
    } else if t.starts_with('[') {
        let inner = strip_delimiters(t, ']')
            .ok_or_else(|| Error::literal_syntax(offset, "unbalanced `[` in value"))?;
        parse_array(inner, offset)
    } else if t.starts_with('"') || t.starts_with('`') {
        let quote = if t.starts_with('"') { '"' } else { '`' };
        let inner = strip_delimiters(t, quote)
            .ok_or_else(|| Error::literal_syntax(offset, "unterminated string literal"))?;
        Ok(Value::String(inner.replace("\\\"", "\"").replace("\\'", "'")))
    } else if t.starts_with('\'') {
        let inner = strip_delimiters(t, '\'')
            .ok_or_else(|| Error::literal_syntax(offset, "unterminated string literal"))?;
        Ok(Value::String(inner.replace("\\'", "'")))
    } else {
        Ok(Value::String(t.to_string()))
    }
}

/// Splits the interior of an array literal into top-level elements (commas
/// inside strings or nested containers do not split) and classifies each
/// element exactly like a bare value.
fn parse_array(interior: &str, offset: usize) -> Result<Value, Error> {
    let t = interior.trim();
    if t.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }

    let bytes = t.as_bytes();
    let mut elements: Vec<&str> = Vec::new();
    let mut start = 0usize;
    let mut state = ScanState::Normal;
    let mut depth: i32 = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        match state {
            ScanState::Normal => {
                if (b == b'"' || b == b'\'' || b == b'`') && !escaped {
                    state = ScanState::InString(b);
                } else if b == b'{' || b == b'[' {
                    depth += 1;
                } else if b == b'}' || b == b']' {
                    depth -= 1;
                } else if b == b',' && depth == 0 {
                    elements.push(&t[start..i]);
                    start = i + 1;
                }
            }
            ScanState::InString(quote) => {
                if b == quote && !escaped {
                    state = ScanState::Normal;
                }
            }
        }
    }

    if let ScanState::InString(_) = state {
        return Err(Error::literal_syntax(
            offset,
            "unterminated string literal in array",
        ));
    }
    if start < t.len() {
        elements.push(&t[start..]);
    }

    let values = elements
        .into_iter()
        .map(|element| classify_value(element, offset))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(values))
}

/// Strips one leading and one trailing quote character from a key,
/// independently of each other.
fn strip_key_quotes(key: &str) -> String {
    let mut k = key;
    if matches!(k.chars().next(), Some('"' | '\'' | '`')) {
        k = &k[1..];
    }
    if matches!(k.chars().last(), Some('"' | '\'' | '`')) {
        k = &k[..k.len() - 1];
    }
    k.to_string()
}

/// Returns the interior of `t` when it closes with `close`, or `None` when
/// the delimiter is missing. The opening delimiter has already been checked
/// by the caller; both delimiters are single ASCII bytes.
fn strip_delimiters(t: &str, close: char) -> Option<&str> {
    if t.len() >= 2 && t.ends_with(close) {
        Some(&t[1..t.len() - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(parse_body("").unwrap(), json!({}));
        assert_eq!(parse_body("   \n\t ").unwrap(), json!({}));
    }

    #[test]
    fn test_unquoted_keys_and_mixed_quotes() {
        let tree = parse_body(r#"a: "x", 'b': 'y', `c`: `z`"#).unwrap();
        assert_eq!(tree, json!({"a": "x", "b": "y", "c": "z"}));
    }

    #[test]
    fn test_escaped_double_quote_in_value() {
        let tree = parse_body(r#"a: "he said \"hi\"""#).unwrap();
        assert_eq!(tree, json!({"a": r#"he said "hi""#}));
    }

    #[test]
    fn test_escaped_single_quote_in_value() {
        let tree = parse_body(r"'a': 'it\'s ok'").unwrap();
        assert_eq!(tree, json!({"a": "it's ok"}));
    }

    #[test]
    fn test_backtick_value_with_markup_and_template() {
        let tree = parse_body(r"a: `tag <b>${x}</b>`").unwrap();
        assert_eq!(tree, json!({"a": "tag <b>${x}</b>"}));
    }

    #[test]
    fn test_nested_object_and_array() {
        let tree = parse_body(r#"a: {b: [1, "x", {c: 2}]}"#).unwrap();
        assert_eq!(tree, json!({"a": {"b": ["1", "x", {"c": "2"}]}}));
    }

    #[test]
    fn test_bare_literals_become_strings() {
        let tree = parse_body("a: 1, b: true, c: null").unwrap();
        assert_eq!(tree, json!({"a": "1", "b": "true", "c": "null"}));
    }

    #[test]
    fn test_trailing_comma_is_tolerated() {
        let tree = parse_body("a: 'x', b: 'y',").unwrap();
        assert_eq!(tree, json!({"a": "x", "b": "y"}));
    }

    #[test]
    fn test_commas_inside_strings_do_not_split() {
        let tree = parse_body(r#"a: "one, two", b: 'three, four'"#).unwrap();
        assert_eq!(tree, json!({"a": "one, two", "b": "three, four"}));
    }

    #[test]
    fn test_braces_inside_strings_are_inert() {
        let tree = parse_body(r#"a: "limit {max} reached", b: "[ok]""#).unwrap();
        assert_eq!(tree, json!({"a": "limit {max} reached", "b": "[ok]"}));
    }

    #[test]
    fn test_array_of_objects() {
        let tree = parse_body(r#"steps: [{t: "one"}, {t: "two"}]"#).unwrap();
        assert_eq!(tree, json!({"steps": [{"t": "one"}, {"t": "two"}]}));
    }

    #[test]
    fn test_empty_object_and_array_values() {
        let tree = parse_body("a: {}, b: []").unwrap();
        assert_eq!(tree, json!({"a": {}, "b": []}));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let tree = parse_body("a: 'x', a: 'y'").unwrap();
        assert_eq!(tree, json!({"a": "y"}));
    }

    #[test]
    fn test_key_order_is_preserved() {
        let tree = parse_body("z: '1', m: '2', a: '3'").unwrap();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "m", "a"]);
    }

    #[test]
    fn test_parse_braced_strips_outer_braces() {
        let tree = parse_braced("  { a: 'x' }  ").unwrap();
        assert_eq!(tree, json!({"a": "x"}));
    }

    #[test]
    fn test_missing_colon_is_fatal() {
        let result = parse_body("justakey");
        assert!(matches!(result, Err(Error::LiteralSyntax { .. })));
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let result = parse_body(r#"a: "open"#);
        assert!(matches!(result, Err(Error::LiteralSyntax { .. })));
    }

    #[test]
    fn test_unbalanced_brace_is_fatal() {
        let result = parse_body("a: {b: 'x'");
        assert!(matches!(result, Err(Error::LiteralSyntax { .. })));
    }

    #[test]
    fn test_unbalanced_bracket_is_fatal() {
        let result = parse_body("a: ['x'");
        assert!(matches!(result, Err(Error::LiteralSyntax { .. })));
    }

    #[test]
    fn test_chinese_text_and_embedded_markup() {
        let tree = parse_body(
            r#"luxuryGifts: "<span>{num} USDT</span> 豪礼等您领取!", title: '欢迎'"#,
        )
        .unwrap();
        assert_eq!(
            tree,
            json!({
                "luxuryGifts": "<span>{num} USDT</span> 豪礼等您领取!",
                "title": "欢迎"
            })
        );
    }
}
