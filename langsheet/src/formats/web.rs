//! Support for loose JS/TS object-literal locale files.
//!
//! Files look like `module.exports = { ... }` (JS) or
//! `export default { ... }` (TS), where the body is a relaxed object
//! literal — unquoted keys, mixed quote styles, nesting — handled by
//! [`crate::literal`]. Values are taken verbatim; unlike the XML and
//! `.strings` adapters there is no escape layer to decode.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::{error::Error, flatten::flatten, formats::WebDialect, literal};

lazy_static! {
    static ref JS_EXPORT: Regex = Regex::new(r"(?s)module\.exports\s*=\s*(\{.*\})").unwrap();
    static ref TS_EXPORT: Regex = Regex::new(r"(?s)export\s+default\s*(\{.*\})").unwrap();
}

/// Parses the exported object literal into a tree.
pub fn extract_tree(contents: &str, dialect: WebDialect) -> Result<Value, Error> {
    let export = match dialect {
        WebDialect::Js => &*JS_EXPORT,
        WebDialect::Ts => &*TS_EXPORT,
    };
    let captures = export.captures(contents).ok_or_else(|| {
        Error::DataMismatch(format!(
            "no `{} {{ ... }}` object literal found",
            dialect.export_marker()
        ))
    })?;
    literal::parse_braced(&captures[1])
}

/// Parses and flattens the exported object literal.
pub fn extract(contents: &str, dialect: WebDialect) -> Result<Map<String, Value>, Error> {
    Ok(flatten(&extract_tree(contents, dialect)?))
}

/// Serializes a tree back into a locale source file body.
pub fn render(tree: &Value, dialect: WebDialect) -> Result<String, Error> {
    let json = serde_json::to_string_pretty(tree)?;
    Ok(format!("{} {}\n", dialect.export_marker(), json))
}
