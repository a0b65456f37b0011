//! Core data model for slicing requests and their results.
//!
//! - `Criterion`: one slicing query (file, line, variable, function, entry, direction).
//! - `CriteriaRow`: a table row, tagged at parse time by whether it carries a label.
//! - `LineSelection`: per-file line numbers reported by the engine (see `selection`).
//! - `SliceResult` / `BatchOutput`: extracted slice text and the labels that go with it.

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod selection;

pub use selection::LineSelection;

/// Entry point used when none is supplied for an ad-hoc criterion.
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// Direction the engine walks the dependence graph from the criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Backward => "backward",
            Direction::Forward => "forward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch-level choice of which slices to compute per criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceMode {
    #[default]
    Backward,
    Forward,
    /// Backward and forward slices of the same criterion, merged.
    Bidirectional,
}

impl SliceMode {
    /// Build the mode from the two CLI-style switches. `bidirectional` wins over `forward`.
    pub fn from_flags(forward: bool, bidirectional: bool) -> Self {
        if bidirectional {
            SliceMode::Bidirectional
        } else if forward {
            SliceMode::Forward
        } else {
            SliceMode::Backward
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SliceMode::Backward => "backward",
            SliceMode::Forward => "forward",
            SliceMode::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for SliceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a composite criterion string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriterionError {
    #[error("criterion `{0}` must have the form file#function#line#&varname")]
    Shape(String),
    #[error("criterion `{0}` has an empty file component")]
    EmptyFile(String),
    #[error("criterion `{input}` has an invalid line `{line}` (expected a positive integer)")]
    Line { input: String, line: String },
    #[error("criterion `{0}` is missing the `&varname` component")]
    Variable(String),
}

/// One slicing query handed to the engine.
///
/// Fields are private; a criterion does not change after construction. The
/// `with_*` helpers consume and return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Criterion {
    file: PathBuf,
    line: NonZeroU32,
    varname: String,
    function: Option<String>,
    entry_point: String,
    direction: Direction,
}

impl Criterion {
    pub fn new(
        file: impl Into<PathBuf>,
        line: NonZeroU32,
        varname: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            varname: varname.into(),
            function: None,
            entry_point: entry_point.into(),
            direction: Direction::Backward,
        }
    }

    /// Restrict the criterion to a function. An empty name clears it.
    pub fn with_function(mut self, function: Option<String>) -> Self {
        self.function = function.filter(|f| !f.is_empty());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Parse the engine's composite form `file#function#line#&varname`.
    ///
    /// The function component may be empty. The file is not checked for
    /// existence: the engine resolves it against the artifact's debug info.
    pub fn parse_composite(
        input: &str,
        entry_point: impl Into<String>,
    ) -> Result<Self, CriterionError> {
        let parts: Vec<&str> = input.splitn(4, '#').collect();
        let [file, function, line, var] = parts.as_slice() else {
            return Err(CriterionError::Shape(input.to_string()));
        };
        if file.is_empty() {
            return Err(CriterionError::EmptyFile(input.to_string()));
        }
        let line = parse_line_number(line).ok_or_else(|| CriterionError::Line {
            input: input.to_string(),
            line: line.to_string(),
        })?;
        let varname = match var.strip_prefix('&') {
            Some(name) if !name.is_empty() => name,
            _ => return Err(CriterionError::Variable(input.to_string())),
        };

        Ok(Criterion::new(*file, line, varname, entry_point)
            .with_function(Some(function.to_string())))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn line(&self) -> NonZeroU32 {
        self.line
    }

    pub fn varname(&self) -> &str {
        &self.varname
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Composite key passed to the engine via `-sc`: `file#function#line#&varname`.
    pub fn engine_key(&self) -> String {
        format!(
            "{}#{}#{}#&{}",
            self.file.display(),
            self.function.as_deref().unwrap_or(""),
            self.line,
            self.varname
        )
    }
}

/// Parse a line number made only of ASCII digits. Zero and overflow are rejected.
pub fn parse_line_number(raw: &str) -> Option<NonZeroU32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().and_then(NonZeroU32::new)
}

/// A row of the criteria table, decided once when the row is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriteriaRow {
    WithLabel { file: String, line: String, varname: String, entry_point: String, label: String },
    WithoutLabel { file: String, line: String, varname: String, entry_point: String },
}

impl CriteriaRow {
    /// Classify raw table fields. Anything other than 4 or 5 fields is not a criterion.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        let field = |i: usize| fields[i].as_ref().to_string();
        match fields.len() {
            4 => Some(CriteriaRow::WithoutLabel {
                file: field(0),
                line: field(1),
                varname: field(2),
                entry_point: field(3),
            }),
            5 => Some(CriteriaRow::WithLabel {
                file: field(0),
                line: field(1),
                varname: field(2),
                entry_point: field(3),
                label: field(4),
            }),
            _ => None,
        }
    }

    fn parts(&self) -> (&str, &str, &str, &str) {
        match self {
            CriteriaRow::WithLabel { file, line, varname, entry_point, .. }
            | CriteriaRow::WithoutLabel { file, line, varname, entry_point } => {
                (file.as_str(), line.as_str(), varname.as_str(), entry_point.as_str())
            }
        }
    }

    pub fn file(&self) -> &str {
        self.parts().0
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            CriteriaRow::WithLabel { label, .. } => Some(label.as_str()),
            CriteriaRow::WithoutLabel { .. } => None,
        }
    }

    /// Validate the row and build its criterion.
    ///
    /// Returns `None` when the file is not an existing regular file or the line
    /// is not all digits; such rows are skipped rather than reported.
    pub fn to_criterion(&self) -> Option<Criterion> {
        let (file, line, varname, entry_point) = self.parts();
        if !Path::new(file).is_file() {
            return None;
        }
        let line = parse_line_number(line)?;
        Some(Criterion::new(file, line, varname, entry_point))
    }
}

/// Extracted slice for one criterion, with its label if the row had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceResult {
    pub text: String,
    pub label: Option<String>,
}

/// Ordered slices and labels of one batch run.
///
/// Consumers index both vectors positionally, so `labels` is either empty or
/// exactly as long as `code_slices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub code_slices: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl BatchOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: SliceResult) {
        self.code_slices.push(result.text);
        if let Some(label) = result.label {
            self.labels.push(label);
        }
    }

    pub fn len(&self) -> usize {
        self.code_slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_slices.is_empty()
    }

    /// True when labels are absent or line up one-to-one with slices.
    pub fn labels_consistent(&self) -> bool {
        self.labels.is_empty() || self.labels.len() == self.code_slices.len()
    }
}
