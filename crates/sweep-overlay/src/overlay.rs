use std::fs;
use std::path::Path;

use serde_yaml::{Number, Value};
use sweep_core::{ErrorInfo, OverlayTarget, SweepError};
use sweep_grid::ParameterRow;

/// Reads and parses the template document.
pub fn load_template(path: &Path) -> Result<Value, SweepError> {
    let bytes = fs::read(path).map_err(|err| {
        SweepError::Template(ErrorInfo::new("template_read", err.to_string()).with_path(path))
    })?;
    serde_yaml::from_slice(&bytes).map_err(|err| {
        SweepError::Template(ErrorInfo::new("template_parse", err.to_string()).with_path(path))
    })
}

/// Overwrites every targeted leaf with the row's value as a YAML float.
///
/// Every key along a target path, the leaf included, must already exist in
/// the document. Untargeted fields are left untouched.
pub fn apply_overlay(
    doc: &mut Value,
    row: &ParameterRow,
    targets: &[OverlayTarget],
) -> Result<(), SweepError> {
    for target in targets {
        let value = row.value(&target.column).ok_or_else(|| {
            SweepError::Overlay(
                ErrorInfo::new("overlay_missing_column", "row has no value for overlay column")
                    .with_context("id", row.id.to_string())
                    .with_context("column", target.column.clone()),
            )
        })?;
        let slot = locate(doc, target, row.id)?;
        *slot = Value::Number(Number::from(value));
    }
    Ok(())
}

fn locate<'a>(
    doc: &'a mut Value,
    target: &OverlayTarget,
    id: u64,
) -> Result<&'a mut Value, SweepError> {
    if target.path.is_empty() {
        return Err(SweepError::Overlay(
            ErrorInfo::new("overlay_empty_path", "overlay target has no key path")
                .with_context("column", target.column.clone()),
        ));
    }
    let mut current = doc;
    for (depth, key) in target.path.iter().enumerate() {
        let reached = target.path[..=depth].join(".");
        if !current.is_mapping() {
            return Err(SweepError::Overlay(
                ErrorInfo::new("overlay_not_mapping", "overlay path crosses a non-mapping value")
                    .with_context("id", id.to_string())
                    .with_context("key", reached),
            ));
        }
        current = current.get_mut(key.as_str()).ok_or_else(|| {
            SweepError::Overlay(
                ErrorInfo::new("overlay_missing_key", "template has no value at overlay key")
                    .with_context("id", id.to_string())
                    .with_context("key", reached.clone())
                    .with_hint("add the key to the template or adjust the overlay section"),
            )
        })?;
    }
    Ok(current)
}
