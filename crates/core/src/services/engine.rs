//! Contract between the driver and the external slicing engine.
//!
//! The engine is asked for one criterion and one direction per call. With
//! `--linenum` it answers with one line per source file:
//!
//! ```text
//! src/commands.c,141,139,120
//! src/util.c,33
//! ```
//!
//! `parse_engine_output` turns that text into a `LineSelection`.

use std::ffi::OsString;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Criterion, Direction, LineSelection};
use crate::services::error::SliceError;

/// Process-level switches shared by every engine call of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Let the engine verify the sliced module. Off by default since it is slow
    /// and only useful when debugging the engine itself.
    pub verify: bool,
}

/// One engine call: a criterion (which carries its direction) against an artifact.
#[derive(Debug, Clone)]
pub struct EngineRequest<'a> {
    pub criterion: &'a Criterion,
    /// Linked bitcode the engine analyzes.
    pub artifact: &'a Path,
    pub options: EngineOptions,
    /// Ask for `file,line,...` output instead of rendered source text.
    pub line_numbers: bool,
}

impl<'a> EngineRequest<'a> {
    pub fn new(criterion: &'a Criterion, artifact: &'a Path, options: EngineOptions) -> Self {
        Self { criterion, artifact, options, line_numbers: true }
    }

    /// Command-line arguments for the engine, artifact last.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-sc".into(),
            self.criterion.engine_key().into(),
            "-entry".into(),
            self.criterion.entry_point().into(),
        ];
        if !self.options.verify {
            args.push("--dont-verify".into());
        }
        if self.criterion.direction() == Direction::Forward {
            args.push("--forward".into());
        }
        if self.line_numbers {
            args.push("--linenum".into());
        }
        args.push(self.artifact.as_os_str().to_os_string());
        args
    }
}

/// An engine that can compute a slice for one criterion at a time.
///
/// Implementations return the engine's standard output unparsed; callers go
/// through [`invoke`] to get a `LineSelection`.
pub trait SliceEngine: Send + Sync {
    fn run(&self, request: &EngineRequest<'_>) -> Result<String, SliceError>;
    fn name(&self) -> &str;
}

/// Run the engine for `criterion` (in its own direction) and parse the result.
pub fn invoke(
    engine: &dyn SliceEngine,
    criterion: &Criterion,
    artifact: &Path,
    options: EngineOptions,
) -> Result<LineSelection, SliceError> {
    let request = EngineRequest::new(criterion, artifact, options);
    debug!(
        engine = engine.name(),
        criterion = %criterion.engine_key(),
        direction = %criterion.direction(),
        "invoking slicing engine"
    );
    let stdout = engine.run(&request)?;
    let selection = parse_engine_output(&stdout)?;
    debug!(files = selection.len(), lines = selection.line_count(), "engine returned selection");
    Ok(selection)
}

/// Parse `file,line,line,...` lines into a selection.
///
/// Blank lines are ignored. An empty file field is kept under the empty key.
/// Any line field that is not a positive integer is an error.
pub fn parse_engine_output(stdout: &str) -> Result<LineSelection, SliceError> {
    let mut selection = LineSelection::new();
    for raw in stdout.lines() {
        if raw.trim().is_empty() {
            continue;
        }
        let mut fields = raw.split(',');
        let file = fields.next().unwrap_or_default();
        let lines = selection.entry(file);
        for field in fields {
            let line = field.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                SliceError::MalformedEngineOutput {
                    line: raw.to_string(),
                    field: field.to_string(),
                }
            })?;
            lines.insert(line);
        }
    }
    Ok(selection)
}
