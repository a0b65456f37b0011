#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Source file with lines `line 1` ..= `line n`.
pub fn numbered_source(dir: &Path, name: &str, n: u32) -> PathBuf {
    let path = dir.join(name);
    let body: String = (1..=n).map(|i| format!("line {i}\n")).collect();
    std::fs::write(&path, body).expect("write source");
    path
}

/// Placeholder bitcode; the fake engine never reads it.
pub fn artifact(dir: &Path) -> PathBuf {
    let path = dir.join("prog.bc");
    std::fs::write(&path, b"BC\xc0\xde").expect("write artifact");
    path
}

/// Shell script standing in for llvm-src-slicer.
///
/// Backward slices select lines 1 and 2 of the criterion's file, forward
/// slices select line 3. Criteria on `broken.c` make the engine fail.
#[cfg(unix)]
pub fn fake_engine(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
file="${2%%#*}"
case "$file" in
  *broken.c) echo "Failed to find the criterion in $file" >&2; exit 3 ;;
esac
case "$*" in
  *--forward*) echo "$file,3" ;;
  *) echo "$file,1,2" ;;
esac
"#;
    let path = dir.join("fake-slicer");
    std::fs::write(&path, script).expect("write fake engine");
    let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake engine");
    path
}
