use tempfile::tempdir;
use varslice_core::db::{
    read_output_json, write_output_json, NewSliceRun, ResultStore, StoreError,
    CURRENT_SCHEMA_VERSION,
};
use varslice_core::model::{BatchOutput, SliceMode};

fn run(mode: SliceMode) -> NewSliceRun {
    NewSliceRun {
        artifact: "prog.bc".into(),
        artifact_hash: Some("abc123".into()),
        mode,
        started_at: "2026-01-01T00:00:00Z".into(),
        finished_at: "2026-01-01T00:00:05Z".into(),
    }
}

#[test]
fn stored_runs_reload_with_positions_intact() {
    let temp = tempdir().unwrap();
    let store = ResultStore::open(&temp.path().join("results.db")).expect("open store");

    let labelled = BatchOutput {
        code_slices: vec!["int a;\n".into(), "".into(), "b++;\n".into()],
        labels: vec!["vuln".into(), "safe".into(), "vuln".into()],
    };
    let unlabelled = BatchOutput { code_slices: vec!["x = 1;\n".into()], labels: vec![] };

    let first = store.insert_run(&run(SliceMode::Bidirectional), &labelled).unwrap();
    let second = store.insert_run(&run(SliceMode::Forward), &unlabelled).unwrap();

    assert_eq!(store.load_output(first).unwrap(), labelled);
    assert_eq!(store.load_output(second).unwrap(), unlabelled);

    let runs = store.list_runs().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].mode, SliceMode::Bidirectional);
    assert_eq!(runs[0].slice_count, 3);
    assert!(runs[0].labelled);
    assert_eq!(runs[1].mode, SliceMode::Forward);
    assert!(!runs[1].labelled);
    assert_eq!(runs[1].artifact_hash.as_deref(), Some("abc123"));
}

#[test]
fn unknown_run_id_is_reported() {
    let store = ResultStore::open_in_memory().unwrap();
    assert!(matches!(store.load_output(42), Err(StoreError::RunNotFound(42))));
    assert!(matches!(store.get_run(7), Err(StoreError::RunNotFound(7))));
}

#[test]
fn newer_schema_is_rejected() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("future.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", CURRENT_SCHEMA_VERSION + 1))
            .unwrap();
    }
    let err = ResultStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedSchemaVersion { .. }), "{err:?}");
}

#[test]
fn reopening_an_existing_store_keeps_runs() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("results.db");
    let output = BatchOutput { code_slices: vec!["a\n".into()], labels: vec![] };
    {
        let store = ResultStore::open(&path).unwrap();
        store.insert_run(&run(SliceMode::Backward), &output).unwrap();
    }
    let store = ResultStore::open(&path).unwrap();
    assert_eq!(store.list_runs().unwrap().len(), 1);
    let version: i32 =
        store.connection().query_row("PRAGMA user_version;", [], |row| row.get(0)).unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn json_record_uses_expected_keys() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("sliced_data.json");
    let output = BatchOutput {
        code_slices: vec!["a\n".into(), "b\n".into()],
        labels: vec!["x".into(), "y".into()],
    };
    write_output_json(&path, &output).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["code_slices"][1], "b\n");
    assert_eq!(value["labels"][0], "x");
    assert_eq!(read_output_json(&path).unwrap(), output);
}
