use std::fs;

use tempfile::tempdir;
use varslice::{default_log_filter, init_tracing, sha256_file};

#[test]
fn sha256_file_hashes_contents() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("prog.bc");
    fs::write(&path, b"abc").unwrap();
    assert_eq!(
        sha256_file(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn sha256_file_errors_for_missing_file() {
    let temp = tempdir().unwrap();
    let err = sha256_file(&temp.path().join("missing.bc")).unwrap_err();
    assert!(err.to_string().contains("Failed to open artifact for hashing"));
}

#[test]
fn verbosity_maps_to_log_filter() {
    assert_eq!(default_log_filter(0), "warn");
    assert_eq!(default_log_filter(1), "info");
    assert_eq!(default_log_filter(2), "debug");
    assert_eq!(default_log_filter(7), "debug");
}

#[test]
fn init_tracing_can_be_called_twice() {
    init_tracing(0);
    init_tracing(2);
}
