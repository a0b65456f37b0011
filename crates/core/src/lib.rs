//! varslice-core
//!
//! Core library for turning an external slicing engine's answers into source
//! excerpts.
//!
//! The engine (`llvm-src-slicer`) computes one slice per process for one
//! criterion and one direction. This crate formats those requests, parses the
//! per-file line numbers that come back, merges backward and forward answers,
//! reads the selected lines out of the source files, and drives whole criteria
//! tables while keeping slices and labels positionally aligned.
//!
//! All substantive logic lives here so it is testable without the engine and
//! reusable from frontends other than the CLI.

pub mod db;
pub mod model;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
