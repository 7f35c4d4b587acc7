//! Starnav CLI library.
//!
//! Catalog file loading, terminal styling and output formatting shared by the
//! `starnav` binary and its tests.

pub mod catalog;
pub mod output;
pub mod terminal;
