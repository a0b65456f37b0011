//! Batch driver: criteria rows in, ordered slices and labels out.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::{
    BatchOutput, CriteriaRow, Criterion, Direction, LineSelection, SliceMode, SliceResult,
    DEFAULT_ENTRY_POINT,
};
use crate::services::engine::{invoke, EngineOptions, SliceEngine};
use crate::services::error::SliceError;
use crate::services::extract::extract_source;

/// Where the criteria of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInput {
    /// A comma-separated criteria table on disk.
    Table(PathBuf),
    /// Rows already read (e.g. from a table parsed elsewhere).
    Rows(Vec<CriteriaRow>),
    /// A single composite criterion `file#function#line#&varname`.
    AdHoc { criterion: String, entry_point: String },
}

impl BatchInput {
    /// Pick the input from the two mutually exclusive sources.
    ///
    /// Exactly one of `table` and `criterion` must be given. The entry point
    /// applies to the ad-hoc criterion only and defaults to `main`.
    pub fn from_parts(
        table: Option<PathBuf>,
        criterion: Option<String>,
        entry_point: Option<String>,
    ) -> Result<Self, SliceError> {
        match (table, criterion) {
            (Some(table), None) => Ok(BatchInput::Table(table)),
            (None, Some(criterion)) => Ok(BatchInput::AdHoc {
                criterion,
                entry_point: entry_point.unwrap_or_else(|| DEFAULT_ENTRY_POINT.to_string()),
            }),
            (Some(_), Some(_)) => Err(SliceError::InvalidInvocation(
                "a criteria table and an ad-hoc criterion were both given; use one".to_string(),
            )),
            (None, None) => Err(SliceError::InvalidInvocation(
                "either a criteria table or an ad-hoc criterion must be provided".to_string(),
            )),
        }
    }
}

/// Read a headerless criteria table.
///
/// Every record is data. Records with other than 4 or 5 fields are dropped
/// here; file and line validation happens when the driver processes the row.
pub fn read_criteria_table(path: &Path) -> Result<Vec<CriteriaRow>, SliceError> {
    let file = std::fs::File::open(path)
        .map_err(|source| SliceError::Io { path: path.to_path_buf(), source })?;
    let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).from_reader(file);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|source| SliceError::Table { path: path.to_path_buf(), source })?;
        let fields: Vec<&str> = record.iter().collect();
        match CriteriaRow::from_fields(&fields) {
            Some(row) => rows.push(row),
            None => debug!(row = idx + 1, fields = fields.len(), "skipping table row"),
        }
    }
    Ok(rows)
}

/// Runs every criterion of a batch through the engine, one at a time.
///
/// Engine answers are cached per criterion and direction for the lifetime of
/// the driver, so repeated rows do not re-run the engine.
pub struct BatchDriver<'a> {
    engine: &'a dyn SliceEngine,
    artifact: PathBuf,
    mode: SliceMode,
    options: EngineOptions,
    cache: HashMap<Criterion, LineSelection>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        engine: &'a dyn SliceEngine,
        artifact: impl Into<PathBuf>,
        mode: SliceMode,
        options: EngineOptions,
    ) -> Self {
        Self { engine, artifact: artifact.into(), mode, options, cache: HashMap::new() }
    }

    pub fn mode(&self) -> SliceMode {
        self.mode
    }

    /// Process an input and return its slices and labels.
    pub fn run(&mut self, input: &BatchInput) -> Result<BatchOutput, SliceError> {
        match input {
            BatchInput::Table(path) => {
                let rows = read_criteria_table(path)?;
                info!(
                    table = %path.display(),
                    rows = rows.len(),
                    mode = %self.mode,
                    "slicing criteria table"
                );
                self.run_rows(&rows)
            }
            BatchInput::Rows(rows) => self.run_rows(rows),
            BatchInput::AdHoc { criterion, entry_point } => {
                let criterion = Criterion::parse_composite(criterion, entry_point.as_str())?;
                info!(
                    criterion = %criterion.engine_key(),
                    mode = %self.mode,
                    "slicing ad-hoc criterion"
                );
                self.run_criterion(&criterion)
            }
        }
    }

    /// Process table rows in order. Invalid rows are skipped; any engine or
    /// extraction failure aborts the whole batch.
    pub fn run_rows(&mut self, rows: &[CriteriaRow]) -> Result<BatchOutput, SliceError> {
        let mut output = BatchOutput::new();
        let mut skipped = 0usize;
        for row in rows {
            let Some(criterion) = row.to_criterion() else {
                debug!(file = row.file(), "skipping row: missing file or non-numeric line");
                skipped += 1;
                continue;
            };
            let text = self.slice_text(&criterion)?;
            output.push(SliceResult { text, label: row.label().map(str::to_string) });
        }

        if !output.labels_consistent() {
            return Err(SliceError::LabelCountMismatch {
                slices: output.code_slices.len(),
                labels: output.labels.len(),
            });
        }

        info!(slices = output.len(), labels = output.labels.len(), skipped, "batch complete");
        Ok(output)
    }

    /// Slice a single criterion into a one-element, unlabelled output.
    pub fn run_criterion(&mut self, criterion: &Criterion) -> Result<BatchOutput, SliceError> {
        let text = self.slice_text(criterion)?;
        let mut output = BatchOutput::new();
        output.push(SliceResult { text, label: None });
        Ok(output)
    }

    /// Line selection for `criterion` under the driver's mode.
    pub fn selection(&mut self, criterion: &Criterion) -> Result<LineSelection, SliceError> {
        match self.mode {
            SliceMode::Backward => self.invoke_cached(criterion, Direction::Backward),
            SliceMode::Forward => self.invoke_cached(criterion, Direction::Forward),
            SliceMode::Bidirectional => {
                // The engine cannot compute both directions in one process.
                let backward = self.invoke_cached(criterion, Direction::Backward)?;
                let forward = self.invoke_cached(criterion, Direction::Forward)?;
                Ok(LineSelection::merged(&backward, &forward))
            }
        }
    }

    /// Extracted source text for `criterion` under the driver's mode.
    pub fn slice_text(&mut self, criterion: &Criterion) -> Result<String, SliceError> {
        let selection = self.selection(criterion)?;
        extract_source(&selection)
    }

    fn invoke_cached(
        &mut self,
        criterion: &Criterion,
        direction: Direction,
    ) -> Result<LineSelection, SliceError> {
        let key = criterion.clone().with_direction(direction);
        if let Some(hit) = self.cache.get(&key) {
            debug!(criterion = %key.engine_key(), %direction, "engine cache hit");
            return Ok(hit.clone());
        }
        let selection = invoke(self.engine, &key, &self.artifact, self.options)?;
        self.cache.insert(key, selection.clone());
        Ok(selection)
    }
}
