use std::path::PathBuf;

use tempfile::tempdir;
use varslice_core::db::{ConfigError, SlicerConfig, DEFAULT_OUTPUT_FILE};

#[test]
fn defaults_apply_without_a_file() {
    let cfg = SlicerConfig::load_or_default(None).unwrap();
    assert_eq!(cfg.default_entry, "main");
    assert!(!cfg.verify);
    assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
    assert!(cfg.engine_path.is_none());
    assert!(!cfg.engine_options().verify);
}

#[test]
fn yaml_config_overrides_some_fields() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("varslice.yaml");
    std::fs::write(&path, "engine_path: /opt/dg/bin/llvm-src-slicer\nverify: true\n").unwrap();

    let cfg = SlicerConfig::load(&path).unwrap();
    assert_eq!(cfg.engine_path, Some(PathBuf::from("/opt/dg/bin/llvm-src-slicer")));
    assert!(cfg.engine_options().verify);
    assert_eq!(cfg.default_entry, "main");
}

#[test]
fn json_config_is_supported() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("varslice.json");
    std::fs::write(&path, r#"{"default_entry":"command_stor","db":"runs.db"}"#).unwrap();

    let cfg = SlicerConfig::load(&path).unwrap();
    assert_eq!(cfg.default_entry, "command_stor");
    assert_eq!(cfg.db, Some(PathBuf::from("runs.db")));
}

#[test]
fn unknown_extension_and_bad_yaml_are_errors() {
    let temp = tempdir().unwrap();
    let toml = temp.path().join("varslice.toml");
    std::fs::write(&toml, "verify = true").unwrap();
    assert!(matches!(SlicerConfig::load(&toml), Err(ConfigError::UnsupportedFormat(_))));

    let yaml = temp.path().join("bad.yaml");
    std::fs::write(&yaml, "verify: [not, a, bool").unwrap();
    assert!(matches!(SlicerConfig::load(&yaml), Err(ConfigError::Yaml { .. })));

    let missing = temp.path().join("missing.yaml");
    assert!(matches!(SlicerConfig::load(&missing), Err(ConfigError::Read { .. })));
}
