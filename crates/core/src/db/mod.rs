//! Configuration and persistence of slicing results.
//!
//! - `SlicerConfig`: file-backed run settings (YAML or JSON).
//! - `ResultStore`: SQLite database of batch runs, schema managed with
//!   `PRAGMA user_version`.
//! - `write_output_json` / `read_output_json`: the plain JSON record
//!   (`code_slices`, `labels`) consumed by downstream tooling.

pub mod config;
pub mod store;

pub use config::{ConfigError, SlicerConfig, DEFAULT_OUTPUT_FILE};
pub use store::{
    read_output_json, write_output_json, NewSliceRun, ResultStore, SliceRunRecord, StoreError,
    StoreResult, CURRENT_SCHEMA_VERSION,
};
