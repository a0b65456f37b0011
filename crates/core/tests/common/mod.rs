#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use varslice_core::model::Direction;
use varslice_core::services::{EngineRequest, SliceEngine, SliceError};

/// Engine stand-in that answers from a table keyed by criterion and direction.
#[derive(Default)]
pub struct ScriptedEngine {
    answers: HashMap<(String, Direction), String>,
    calls: Mutex<Vec<(String, Direction)>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, key: impl Into<String>, direction: Direction, stdout: &str) -> Self {
        self.answers.insert((key.into(), direction), stdout.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, Direction)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SliceEngine for ScriptedEngine {
    fn run(&self, request: &EngineRequest<'_>) -> Result<String, SliceError> {
        let key = request.criterion.engine_key();
        let direction = request.criterion.direction();
        self.calls.lock().unwrap().push((key.clone(), direction));
        Ok(self.answers.get(&(key, direction)).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Write `lines` (each terminated by `\n`) to `dir/name` and return the path.
pub fn write_source(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    path
}

/// Source file with `count` lines reading `line 1`, `line 2`, ...
pub fn numbered_source(dir: &Path, name: &str, count: usize) -> PathBuf {
    let lines: Vec<String> = (1..=count).map(|n| format!("line {n}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_source(dir, name, &refs)
}

/// Composite engine key for a criterion without a function.
pub fn key(file: &Path, line: u32, var: &str) -> String {
    format!("{}##{}#&{}", file.display(), line, var)
}
