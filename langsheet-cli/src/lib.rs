//! Command implementations for the `langsheet` binary, exposed as a
//! library so integration tests can drive them directly.

pub mod collect;
pub mod complete;
pub mod generate;
pub mod output;
pub mod summary;
