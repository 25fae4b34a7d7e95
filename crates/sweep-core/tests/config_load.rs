use std::path::PathBuf;

use sweep_core::{load_config, FailurePolicy, OverlayTarget, SweepConfig, SweepError};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
}

#[test]
fn fixture_config_resolves_relative_paths() {
    let path = fixture_path("fixtures/immunity_validation/sweep.yaml");
    let config = load_config(&path).expect("config loads");
    let base = path.parent().expect("parent").to_path_buf();
    assert_eq!(config.base_dir, base);
    assert_eq!(config.params_path(), base.join("params.csv"));
    assert_eq!(config.template_path(), base.join("input.yml"));
    assert_eq!(config.parameters.len(), 3);
    assert_eq!(config.dispatch.workers, 4);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("sweep.yaml");
    std::fs::write(&path, "dispatch:\n  workers: 2\n  failure_policy: report\n").expect("write");
    let config = load_config(&path).expect("config loads");
    let defaults = SweepConfig::default();
    assert_eq!(config.parameters, defaults.parameters);
    assert_eq!(config.paths, defaults.paths);
    assert_eq!(config.dispatch.workers, 2);
    assert_eq!(config.dispatch.failure_policy, FailurePolicy::Report);
    assert_eq!(config.dispatch.max_retries, 0);
}

#[test]
fn default_targets_live_under_immune_section() {
    let config = SweepConfig::default();
    let targets = config.overlay_targets();
    assert_eq!(targets.len(), 3);
    assert_eq!(
        targets[2],
        OverlayTarget {
            column: "mid_point".to_string(),
            path: vec![
                "immune_system_parameters".to_string(),
                "mid_point".to_string()
            ],
        }
    );
    assert_eq!(targets[0].dotted(), "immune_system_parameters.max_clinical_probability");
}

#[test]
fn explicit_targets_replace_section_rule() {
    let yaml = r#"
overlay:
  targets:
    - column: mid_point
      path: [immune_system_parameters, immunity_boost, mid]
"#;
    let mut config: SweepConfig = serde_yaml::from_str(yaml).expect("parse");
    config.base_dir = PathBuf::from("/srv/sweeps");
    let targets = config.overlay_targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].dotted(), "immune_system_parameters.immunity_boost.mid");
    assert_eq!(config.output_dir(), PathBuf::from("/srv/sweeps/."));
}

#[test]
fn yaml_roundtrip_preserves_config() {
    let config = SweepConfig::default();
    let yaml = config.to_yaml_string().expect("serialize");
    let mut reparsed: SweepConfig = serde_yaml::from_str(&yaml).expect("reparse");
    reparsed.base_dir = config.base_dir.clone();
    assert_eq!(config, reparsed);
}

#[test]
fn malformed_config_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("sweep.yaml");
    std::fs::write(&path, "dispatch:\n  workers: many\n").expect("write");
    let err = load_config(&path).expect_err("should fail");
    assert!(matches!(err, SweepError::Config(_)));
    assert!(err.info().context.contains_key("path"));
}
