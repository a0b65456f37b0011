use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use varslice_core::db::{ResultStore, SliceRunRecord};
use varslice_core::model::BatchOutput;

#[derive(Debug, Serialize)]
pub struct RunDetail {
    pub run: SliceRunRecord,
    pub output: BatchOutput,
}

fn open_store(db: &Path) -> Result<ResultStore> {
    if !db.is_file() {
        anyhow::bail!("Results database does not exist: {}", db.display());
    }
    ResultStore::open(db)
        .with_context(|| format!("Failed to open results database at {}", db.display()))
}

/// List runs recorded in a results database.
pub fn list_runs_command(db: &Path, json: bool) -> Result<()> {
    let store = open_store(db)?;
    let runs = store.list_runs().context("Failed to list slice runs")?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&runs).context("Failed to serialize runs to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Slice runs ({}):", runs.len());
    if runs.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for run in runs {
        let labels = if run.labelled { "labelled" } else { "unlabelled" };
        println!(
            "  - #{} {} [{}] {} slices, {} ({})",
            run.id,
            run.artifact,
            run.mode,
            run.slice_count,
            labels,
            run.finished_at
        );
    }

    Ok(())
}

/// Print one stored run: its metadata, then each slice with its label.
pub fn show_run_command(db: &Path, id: i64, json: bool) -> Result<()> {
    let store = open_store(db)?;
    let run = store.get_run(id).with_context(|| format!("Failed to load slice run {id}"))?;
    let output =
        store.load_output(id).with_context(|| format!("Failed to load slices of run {id}"))?;

    if json {
        let detail = RunDetail { run, output };
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("Slice run #{}", run.id);
    println!("  Artifact: {}", run.artifact);
    println!("  Hash: {}", run.artifact_hash.as_deref().unwrap_or("-"));
    println!("  Mode: {}", run.mode);
    println!("  Started: {}", run.started_at);
    println!("  Finished: {}", run.finished_at);
    for (idx, slice) in output.code_slices.iter().enumerate() {
        match output.labels.get(idx) {
            Some(label) => println!("--- slice {idx} [{label}] ---"),
            None => println!("--- slice {idx} ---"),
        }
        print!("{slice}");
        if !slice.is_empty() && !slice.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
