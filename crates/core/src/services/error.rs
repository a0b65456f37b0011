use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::model::CriterionError;

/// Errors that abort a slicing run.
///
/// Every variant is fatal for the whole batch. Rows that simply do not look
/// like criteria are skipped by the driver and never produce an error.
#[derive(Debug, Error)]
pub enum SliceError {
    /// The engine executable could not be started.
    #[error(
        "slicing engine `{}` could not be executed: {source}. Install llvm-src-slicer, put it on PATH, or pass --engine / set VARSLICE_ENGINE",
        .path.display()
    )]
    EngineNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran and exited unsuccessfully; `stderr` is its diagnostic verbatim.
    #[error("slicing engine failed ({status}) for criterion {criterion}: {}", .stderr.trim_end())]
    EngineFailed { criterion: String, status: ExitStatus, stderr: String },

    /// A line of engine output did not follow `file,line,line,...`.
    #[error("malformed engine output line `{line}`: `{field}` is not a positive line number")]
    MalformedEngineOutput { line: String, field: String },

    /// A file named in a selection could not be read at extraction time.
    #[error("source file {} is unavailable: {source}", .path.display())]
    SourceFileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some, but not all, rows of a batch carried a label.
    #[error("number of labels ({labels}) and code slices ({slices}) do not match")]
    LabelCountMismatch { slices: usize, labels: usize },

    /// The caller supplied neither or both of a criteria table and an ad-hoc criterion,
    /// or an ad-hoc criterion that does not parse.
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    /// The criteria table itself could not be read.
    #[error("failed to read criteria table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The criteria table could not be decoded as CSV.
    #[error("failed to parse criteria table {}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl From<CriterionError> for SliceError {
    fn from(err: CriterionError) -> Self {
        SliceError::InvalidInvocation(err.to_string())
    }
}
