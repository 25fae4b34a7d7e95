use std::path::Path;

use sweep_core::errors::{ErrorInfo, SweepError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "17")
        .with_context("reason", "example")
}

#[test]
fn table_error_surface() {
    let err = SweepError::Table(sample_info("T001", "missing id column"));
    assert_eq!(err.info().code, "T001");
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn overlay_error_surface() {
    let info = sample_info("O001", "missing key").with_hint("check the section");
    let err = SweepError::Overlay(info);
    let rendered = err.to_string();
    assert!(rendered.starts_with("overlay error: missing key (code: O001)"));
    assert!(rendered.contains("id=17, reason=example"));
    assert!(rendered.ends_with("hint: check the section"));
}

#[test]
fn io_helper_records_path() {
    let err = SweepError::io("template_read", Path::new("/tmp/input.yml"), "not found");
    assert!(matches!(err, SweepError::Io(_)));
    assert_eq!(err.info().context["path"], "/tmp/input.yml");
    assert_eq!(err.info().message, "not found");
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = SweepError::Dispatch(ErrorInfo::new("thread_pool", "no threads"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Dispatch");
    assert_eq!(json["detail"]["code"], "thread_pool");
}
