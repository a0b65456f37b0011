use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::services::engine::{EngineRequest, SliceEngine};
use crate::services::error::SliceError;

/// Environment variable naming the engine executable when no explicit path is configured.
pub const ENGINE_ENV_VAR: &str = "VARSLICE_ENGINE";

/// Executable looked up on `PATH` when nothing else is configured.
const DEFAULT_ENGINE: &str = "llvm-src-slicer";

/// Engine backed by the `llvm-src-slicer` executable, run once per request.
///
/// The engine keeps global analysis state, so every request is a fresh process
/// and calls are never overlapped.
#[derive(Debug, Clone)]
pub struct SrcSlicerEngine {
    path: PathBuf,
}

impl SrcSlicerEngine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Engine at the explicit path if given, otherwise resolved from the environment.
    pub fn from_config(explicit: Option<&Path>) -> Self {
        Self::new(explicit.map(Path::to_path_buf).unwrap_or_else(resolve_engine_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SrcSlicerEngine {
    fn default() -> Self {
        Self::new(resolve_engine_path())
    }
}

impl SliceEngine for SrcSlicerEngine {
    fn run(&self, request: &EngineRequest<'_>) -> Result<String, SliceError> {
        let args = request.args();
        debug!(engine = %self.path.display(), ?args, "spawning engine");

        let output = Command::new(&self.path)
            .args(&args)
            .output()
            .map_err(|source| SliceError::EngineNotFound { path: self.path.clone(), source })?;

        if !output.status.success() {
            return Err(SliceError::EngineFailed {
                criterion: request.criterion.engine_key(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn name(&self) -> &str {
        "llvm-src-slicer"
    }
}

/// `VARSLICE_ENGINE` if set, otherwise `llvm-src-slicer` from `PATH`.
pub fn resolve_engine_path() -> PathBuf {
    std::env::var_os(ENGINE_ENV_VAR)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE))
}
