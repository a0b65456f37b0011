use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use varslice::commands::{list_runs_command, show_run_command, slice_command, SliceOptions};
use varslice::init_tracing;

/// Source slicing driver for llvm-src-slicer.
///
/// This CLI is a thin wrapper around `varslice-core` (exposed in code as `varslice_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "varslice",
    version,
    about = "Slice programs on variables and collect the source lines of each slice",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Slice a criteria table (-f) or a single criterion (--sc).
    ///
    /// Each criterion is sent to llvm-src-slicer; the returned line numbers
    /// are read back out of the source files. With --bidirectional the
    /// backward and forward slices are computed separately and merged.
    Slice(SliceOptions),

    /// List runs recorded in a results database.
    ListRuns {
        /// Results database written by `slice --db`.
        #[arg(long)]
        db: PathBuf,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the slices and labels of one recorded run.
    ShowRun {
        /// Results database written by `slice --db`.
        #[arg(long)]
        db: PathBuf,

        /// Run id as shown by `list-runs`.
        #[arg(long)]
        id: i64,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Slice(opts) => {
            slice_command(&opts)?;
        }
        Command::ListRuns { db, json } => list_runs_command(&db, json)?,
        Command::ShowRun { db, id, json } => show_run_command(&db, id, json)?,
    }

    Ok(())
}
