//! All error types for the langsheet crate.
//!
//! These are returned from all fallible operations (parsing, reconciliation,
//! serialization, configuration loading, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("object literal syntax error at byte {offset}: {message}")]
    LiteralSyntax { offset: usize, message: String },

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("sheet error: {0}")]
    SheetParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("invalid data: {0}")]
    DataMismatch(String),
}

impl Error {
    /// Creates a new object-literal syntax error at the given byte offset.
    pub fn literal_syntax(offset: usize, message: impl Into<String>) -> Self {
        Error::LiteralSyntax {
            offset,
            message: message.into(),
        }
    }

    /// Creates a new invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }

    /// Creates a new missing-input error.
    pub fn missing_input(message: impl Into<String>) -> Self {
        Error::MissingInput(message.into())
    }
}
