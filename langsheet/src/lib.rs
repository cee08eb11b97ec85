#![forbid(unsafe_code)]
//! Reconciles translation spreadsheets with per-locale source files.
//!
//! A translation sheet holds one row per logical string, with one column
//! per language and one entry-name column per application. The locale
//! files live in several textual formats: loose JS/TS object-literal
//! exports, Android `strings.xml`, and Apple `.strings`. This crate
//! converts between the two worlds and reconciles them — it fans a master
//! language out to target languages, finds catalog keys the sheet does not
//! claim for any application, and finds entries whose translation never
//! actually changed from the source text.
//!
//! # Quick Start
//!
//! ```rust
//! use langsheet::{reconcile, ReconcileOptions};
//! use langsheet::sheet::{SheetLayout, SheetRow};
//!
//! let mut source = serde_json::Map::new();
//! source.insert("home.title".into(), "欢迎".into());
//!
//! let mut cells = vec![String::new(); 21];
//! cells[11] = "欢迎".into();
//! cells[12] = "Welcome".into();
//! let rows = vec![SheetRow::new(cells)];
//!
//! let options = ReconcileOptions {
//!     source_lang: "zh".into(),
//!     target_langs: vec!["en".into()],
//!     app_name: "H5APP".into(),
//!     ..ReconcileOptions::default()
//! };
//! let outcome = reconcile(&source, &rows, &SheetLayout::default(), &options)?;
//! assert_eq!(outcome.target_catalog["en.home.title"], "Welcome");
//! # Ok::<(), langsheet::Error>(())
//! ```
//!
//! # Pipeline
//!
//! Format adapters ([`formats`]) extract entries, the loose parser
//! ([`literal`]) handles the JS/TS object-literal bodies, [`flatten`] maps
//! trees to dot-path catalogs and back, [`catalog`] scopes and merges them,
//! [`reconcile`](crate::reconcile) runs the engine, and [`summary`] builds
//! equivalence-grouped spreadsheet rows.

pub mod catalog;
pub mod config;
pub mod error;
pub mod flatten;
pub mod formats;
pub mod literal;
pub mod normalize;
pub mod reconcile;
pub mod sheet;
pub mod summary;

// Re-export the most used types for easy consumption.
pub use crate::{
    config::Config,
    error::Error,
    formats::{FormatKind, WebDialect},
    reconcile::{
        MissingKeyRecord, MissingTermRecord, ReconcileOptions, ReconcileOutcome, norm, reconcile,
    },
};
