use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::{info, warn};

use varslice_core::db::{write_output_json, NewSliceRun, ResultStore, SlicerConfig};
use varslice_core::model::{BatchOutput, SliceMode};
use varslice_core::services::backends::SrcSlicerEngine;
use varslice_core::services::{BatchDriver, BatchInput};

use crate::sha256_file;

/// Arguments of the `slice` command.
#[derive(Args, Debug, Clone, Default)]
pub struct SliceOptions {
    /// Linked LLVM bitcode of the program (e.g. the output of llvm-link).
    pub artifact: PathBuf,

    /// CSV of criteria: file,line,varname,entry[,label]. No header row.
    #[arg(short = 'f', long = "table", value_name = "CSV")]
    pub table: Option<PathBuf>,

    /// Single criterion in the form file#function#line#&varname.
    #[arg(long = "sc", value_name = "CRITERION")]
    pub criterion: Option<String>,

    /// Entry function for --sc (defaults to the config's default_entry, then main).
    #[arg(long)]
    pub entry: Option<String>,

    /// Compute forward slices instead of backward ones.
    #[arg(long, default_value_t = false)]
    pub forward: bool,

    /// Merge backward and forward slices of each criterion.
    #[arg(long, short = 'b', default_value_t = false)]
    pub bidirectional: bool,

    /// Print the slice of an ad-hoc criterion instead of writing the output file.
    #[arg(long, short = 'p', default_value_t = false)]
    pub print: bool,

    /// JSON output file (defaults to the config's output, then sliced_data.json).
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Also record the run in this SQLite results database.
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to llvm-src-slicer (overrides config and VARSLICE_ENGINE).
    #[arg(long)]
    pub engine: Option<PathBuf>,

    /// YAML or JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Let the engine verify sliced modules.
    #[arg(long, default_value_t = false)]
    pub dbg: bool,
}

/// Slice a criteria table or a single criterion and persist (or print) the result.
pub fn slice_command(opts: &SliceOptions) -> Result<BatchOutput> {
    let config = SlicerConfig::load_or_default(opts.config.as_deref())
        .context("Failed to load slicer config")?;

    if opts.bidirectional && opts.forward {
        warn!("--bidirectional given; --forward is ignored");
    }
    if opts.table.is_some() && opts.entry.is_some() {
        warn!("criteria table given; --entry is ignored (each row names its entry point)");
    }
    let mut print = opts.print;
    if opts.table.is_some() && print {
        warn!("cannot print when a criteria table is given; writing the output file instead");
        print = false;
    }

    let entry = opts.entry.clone().unwrap_or_else(|| config.default_entry.clone());
    let input = BatchInput::from_parts(opts.table.clone(), opts.criterion.clone(), Some(entry))?;

    if !opts.artifact.is_file() {
        bail!("Artifact does not exist: {}", opts.artifact.display());
    }

    let mode = SliceMode::from_flags(opts.forward, opts.bidirectional);
    let engine =
        SrcSlicerEngine::from_config(opts.engine.as_deref().or(config.engine_path.as_deref()));
    let mut options = config.engine_options();
    options.verify |= opts.dbg;
    info!(
        engine = %engine.path().display(),
        %mode,
        verify = options.verify,
        "starting slicing run"
    );

    let started_at = Utc::now().to_rfc3339();
    let mut driver = BatchDriver::new(&engine, &opts.artifact, mode, options);
    let output = driver.run(&input).context("Slicing failed")?;
    let finished_at = Utc::now().to_rfc3339();

    if print {
        match output.code_slices.first() {
            Some(slice) => println!("{slice}"),
            None => println!(),
        }
    } else {
        let output_path = opts.output.clone().unwrap_or_else(|| config.output.clone());
        write_output_json(&output_path, &output).with_context(|| {
            format!("Failed to write slice output to {}", output_path.display())
        })?;
        println!("Sliced {} criteria ({mode})", output.len());
        println!("  Labels: {}", output.labels.len());
        println!("  Output: {}", output_path.display());
    }

    if let Some(db_path) = opts.db.clone().or_else(|| config.db.clone()) {
        let store = ResultStore::open(&db_path)
            .with_context(|| format!("Failed to open results database at {}", db_path.display()))?;
        let run = NewSliceRun {
            artifact: opts.artifact.display().to_string(),
            artifact_hash: Some(sha256_file(&opts.artifact)?),
            mode,
            started_at,
            finished_at,
        };
        let id = store.insert_run(&run, &output).context("Failed to record slice run")?;
        if !print {
            println!("  Run id: {id} ({})", db_path.display());
        }
    }

    Ok(output)
}
