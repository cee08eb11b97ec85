//! All supported locale file formats.
//!
//! This module provides the [`FormatKind`] tagged variant for generic format
//! handling. A kind is selected once (from configuration or a file
//! extension) and threaded explicitly; nothing re-dispatches on extension
//! strings per call.

pub mod android;
pub mod strings;
pub mod web;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde_json::{Map, Value};

use crate::error::Error;

/// The JS/TS dialect of a web locale file. The two differ only in the
/// export marker wrapping the object literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebDialect {
    Js,
    Ts,
}

impl WebDialect {
    /// The marker preceding the object literal in a source file.
    pub fn export_marker(&self) -> &'static str {
        match self {
            WebDialect::Js => "module.exports =",
            WebDialect::Ts => "export default",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            WebDialect::Js => "js",
            WebDialect::Ts => "ts",
        }
    }

    /// Resolves a dialect from a file extension such as `js`, `.ts`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "js" => Some(WebDialect::Js),
            "ts" => Some(WebDialect::Ts),
            _ => None,
        }
    }
}

/// Represents all supported locale file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Loose JS/TS object-literal exports.
    Web(WebDialect),
    /// Android `strings.xml` resources.
    AndroidXml,
    /// Apple `.strings` tables.
    AppleStrings,
}

impl Display for FormatKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatKind::Web(WebDialect::Js) => write!(f, "web-js"),
            FormatKind::Web(WebDialect::Ts) => write!(f, "web-ts"),
            FormatKind::AndroidXml => write!(f, "android"),
            FormatKind::AppleStrings => write!(f, "ios"),
        }
    }
}

impl FromStr for FormatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "web-js" | "js" => Ok(FormatKind::Web(WebDialect::Js)),
            "web-ts" | "ts" => Ok(FormatKind::Web(WebDialect::Ts)),
            "android" | "xml" => Ok(FormatKind::AndroidXml),
            "ios" | "strings" => Ok(FormatKind::AppleStrings),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatKind {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::Web(dialect) => dialect.extension(),
            FormatKind::AndroidXml => "xml",
            FormatKind::AppleStrings => "strings",
        }
    }

    /// Resolves a kind from a file extension (`js`, `ts`, `xml`,
    /// `strings`), with or without the leading dot.
    pub fn from_extension(ext: &str) -> Result<Self, Error> {
        match ext.trim_start_matches('.') {
            "js" => Ok(FormatKind::Web(WebDialect::Js)),
            "ts" => Ok(FormatKind::Web(WebDialect::Ts)),
            "xml" => Ok(FormatKind::AndroidXml),
            "strings" => Ok(FormatKind::AppleStrings),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }

    /// Extracts one file's entries as a flat dot-path map.
    ///
    /// Android and iOS files decode their escaped values; web files are
    /// parsed as object literals and flattened with values verbatim.
    pub fn extract(&self, contents: &str) -> Result<Map<String, Value>, Error> {
        match self {
            FormatKind::Web(dialect) => web::extract(contents, *dialect),
            FormatKind::AndroidXml => Ok(android::extract(contents)),
            FormatKind::AppleStrings => Ok(strings::extract(contents)),
        }
    }
}
