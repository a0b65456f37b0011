use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{BatchOutput, SliceMode};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Error type for result persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },

    #[error("No slice run with id {0}")]
    RunNotFound(i64),
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Metadata recorded for a finished batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSliceRun {
    /// Artifact path as given on the command line.
    pub artifact: String,
    /// SHA-256 of the artifact, when computed.
    pub artifact_hash: Option<String>,
    pub mode: SliceMode,
    pub started_at: String,
    pub finished_at: String,
}

/// A stored run as listed from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRunRecord {
    pub id: i64,
    pub artifact: String,
    pub artifact_hash: Option<String>,
    pub mode: SliceMode,
    pub started_at: String,
    pub finished_at: String,
    pub slice_count: usize,
    pub labelled: bool,
}

/// SQLite-backed store of batch outputs.
///
/// Each run keeps its slices as positioned entries so slice `i` and label `i`
/// always come back together.
#[derive(Debug)]
pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Open (or create) a results database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory store, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a run and all of its slices; returns the run id.
    pub fn insert_run(&self, run: &NewSliceRun, output: &BatchOutput) -> StoreResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO slice_runs (artifact, artifact_hash, mode, started_at, finished_at, slice_count, labelled)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                run.artifact,
                run.artifact_hash,
                run.mode.as_str(),
                run.started_at,
                run.finished_at,
                output.code_slices.len() as i64,
                if output.labels.is_empty() { 0 } else { 1 }
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO slice_entries (run_id, position, text, label)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for (idx, text) in output.code_slices.iter().enumerate() {
                stmt.execute(params![run_id, idx as i64, text, output.labels.get(idx)])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }

    /// List all runs (ordered by id).
    pub fn list_runs(&self) -> StoreResult<Vec<SliceRunRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, artifact, artifact_hash, mode, started_at, finished_at, slice_count, labelled
            FROM slice_runs
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], map_run)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn get_run(&self, id: i64) -> StoreResult<SliceRunRecord> {
        self.conn
            .query_row(
                r#"
                SELECT id, artifact, artifact_hash, mode, started_at, finished_at, slice_count, labelled
                FROM slice_runs
                WHERE id = ?1
                "#,
                params![id],
                map_run,
            )
            .optional()?
            .ok_or(StoreError::RunNotFound(id))
    }

    /// Load the slices and labels of a run in their original positions.
    pub fn load_output(&self, id: i64) -> StoreResult<BatchOutput> {
        // Surface a clear error for unknown ids rather than an empty output.
        self.get_run(id)?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT text, label
            FROM slice_entries
            WHERE run_id = ?1
            ORDER BY position
            "#,
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut output = BatchOutput::new();
        for row in rows {
            let (text, label) = row?;
            output.code_slices.push(text);
            if let Some(label) = label {
                output.labels.push(label);
            }
        }
        Ok(output)
    }
}

fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<SliceRunRecord> {
    let mode: String = row.get(3)?;
    Ok(SliceRunRecord {
        id: row.get(0)?,
        artifact: row.get(1)?,
        artifact_hash: row.get(2)?,
        mode: parse_mode(&mode)?,
        started_at: row.get(4)?,
        finished_at: row.get(5)?,
        slice_count: row.get::<_, i64>(6)? as usize,
        labelled: row.get::<_, i64>(7)? != 0,
    })
}

fn parse_mode(mode: &str) -> rusqlite::Result<SliceMode> {
    match mode.to_lowercase().as_str() {
        "backward" => Ok(SliceMode::Backward),
        "forward" => Ok(SliceMode::Forward),
        "bidirectional" => Ok(SliceMode::Bidirectional),
        _ => Err(rusqlite::Error::InvalidQuery),
    }
}

/// Write a batch output as pretty JSON (`code_slices`, `labels`).
pub fn write_output_json(path: &Path, output: &BatchOutput) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn read_output_json(path: &Path) -> StoreResult<BatchOutput> {
    let body = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&body)?)
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: slice_runs and slice_entries
fn apply_migrations(conn: &Connection) -> StoreResult<()> {
    let current_version = current_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS slice_runs (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                artifact      TEXT NOT NULL,
                artifact_hash TEXT,
                mode          TEXT NOT NULL,
                started_at    TEXT NOT NULL,
                finished_at   TEXT NOT NULL,
                slice_count   INTEGER NOT NULL,
                labelled      INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS slice_entries (
                run_id   INTEGER NOT NULL REFERENCES slice_runs(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                text     TEXT NOT NULL,
                label    TEXT,
                PRIMARY KEY (run_id, position)
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
