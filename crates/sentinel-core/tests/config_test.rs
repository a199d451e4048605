//! Tests for the Sentinel configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use sentinel_core::config::{CliOverrides, SentinelConfig};
use sentinel_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all SENTINEL_ env vars to prevent cross-test contamination.
fn clear_sentinel_env_vars() {
    for key in [
        "SENTINEL_MAX_INPUT_CHARS",
        "SENTINEL_HIGH_THRESHOLD",
        "SENTINEL_MEDIUM_THRESHOLD",
        "SENTINEL_MODEL_PATH",
        "SENTINEL_SCHEMA_PATH",
        "SENTINEL_PATTERNS_PATH",
        "SENTINEL_HOT_RELOAD",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sentinel_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("sentinel.toml"),
        r#"
[admission]
max_input_chars = 10_000

[model]
model_path = "project/model.json"
hot_reload = false
"#,
    )
    .unwrap();

    std::env::set_var("SENTINEL_MAX_INPUT_CHARS", "20000");

    let cli = CliOverrides {
        model_path: Some(PathBuf::from("cli/model.json")),
        ..Default::default()
    };

    let config = SentinelConfig::load(dir.path(), Some(&cli)).unwrap();

    // Env beats project
    assert_eq!(config.admission.max_input_chars, Some(20_000));
    // CLI beats project
    assert_eq!(config.model.model_path, Some(PathBuf::from("cli/model.json")));
    // Project survives where nothing overrides it
    assert!(!config.model.effective_hot_reload());

    clear_sentinel_env_vars();
}

#[test]
fn test_defaults_without_files() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sentinel_env_vars();

    let dir = tempdir();
    let config = SentinelConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.admission.effective_max_input_chars(), 50_000);
    assert!((config.fusion.effective_high_threshold() - 0.85).abs() < f64::EPSILON);
    assert!((config.fusion.effective_medium_threshold() - 0.40).abs() < f64::EPSILON);
    assert!((config.fusion.effective_fallback_keyword_probability() - 0.5).abs() < f64::EPSILON);
    assert!((config.fusion.effective_fallback_clean_probability() - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.fusion.effective_snippet_max_chars(), 120);
    assert!(config.model.effective_hot_reload());
    assert!(config.corpus.effective_parallel());
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_sentinel_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("sentinel.toml"), "not valid toml {{{{").unwrap();

    match SentinelConfig::load(dir.path(), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let result = SentinelConfig::from_toml("[fusion]\nhigh_threshold = 1.5\n");
    match result {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "fusion.high_threshold");
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }
}

#[test]
fn test_medium_must_stay_below_high() {
    let result = SentinelConfig::from_toml(
        "[fusion]\nhigh_threshold = 0.5\nmedium_threshold = 0.6\n",
    );
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_zero_input_limit_rejected() {
    let result = SentinelConfig::from_toml("[admission]\nmax_input_chars = 0\n");
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_unknown_keys_ignored() {
    let config = SentinelConfig::from_toml(
        "[fusion]\nhigh_threshold = 0.9\nfuture_knob = true\n\n[telemetry]\nenabled = true\n",
    )
    .unwrap();
    assert_eq!(config.fusion.high_threshold, Some(0.9));
}

#[test]
fn test_toml_round_trip() {
    let config = SentinelConfig::from_toml(
        "[fusion]\nhigh_threshold = 0.9\nsnippet_max_chars = 80\n\n[model]\nschema_path = \"schema.json\"\n",
    )
    .unwrap();
    let rendered = config.to_toml().unwrap();
    let reparsed = SentinelConfig::from_toml(&rendered).unwrap();
    assert_eq!(reparsed.fusion.high_threshold, Some(0.9));
    assert_eq!(reparsed.fusion.snippet_max_chars, Some(80));
    assert_eq!(reparsed.model.schema_path, Some(PathBuf::from("schema.json")));
}
