use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::debug;
use sweep_core::{ErrorInfo, ParameterRange, SweepError};

use crate::table::{ParameterRow, ParameterTable};

/// Returns `count` evenly spaced values from `low` to `high`, both endpoints included.
///
/// A single sample yields `[low]`; the final sample of longer sequences is
/// pinned to `high` so accumulated rounding never moves the endpoint.
pub fn linspace(low: f64, high: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| low + step * i as f64).collect();
            values[count - 1] = high;
            values
        }
    }
}

/// Expands the Cartesian product of all ranges into a sequentially numbered table.
///
/// The first range varies slowest. Identifiers start at zero and follow
/// product iteration order. Duplicate parameter names and grids whose row
/// count overflows `usize` are rejected.
pub fn generate_grid(ranges: &[ParameterRange]) -> Result<ParameterTable, SweepError> {
    let mut seen = BTreeSet::new();
    for range in ranges {
        if !seen.insert(range.name.as_str()) {
            return Err(SweepError::Table(
                ErrorInfo::new("grid_duplicate_column", "parameter name appears more than once")
                    .with_context("column", range.name.clone())
                    .with_hint("give every swept parameter a distinct name"),
            ));
        }
    }
    let capacity = ranges
        .iter()
        .try_fold(1usize, |acc, range| acc.checked_mul(range.samples))
        .ok_or_else(|| {
            SweepError::Table(
                ErrorInfo::new("grid_too_large", "grid row count overflows")
                    .with_context("dimensions", ranges.len().to_string()),
            )
        })?;
    let axes: Vec<Vec<f64>> = ranges
        .iter()
        .map(|range| linspace(range.min, range.max, range.samples))
        .collect();
    let mut combos = Vec::with_capacity(capacity);
    expand_grid(&axes, 0, &mut Vec::with_capacity(axes.len()), &mut combos);

    let columns: Vec<String> = ranges.iter().map(|range| range.name.clone()).collect();
    let rows = combos
        .into_iter()
        .enumerate()
        .map(|(idx, combo)| {
            let values: IndexMap<String, f64> = columns.iter().cloned().zip(combo).collect();
            let row = ParameterRow::new(idx as u64, values);
            debug!("grid row {}: {:?}", row.id, row.values);
            row
        })
        .collect();
    Ok(ParameterTable::new(columns, rows))
}

fn expand_grid(
    axes: &[Vec<f64>],
    idx: usize,
    current: &mut Vec<f64>,
    outputs: &mut Vec<Vec<f64>>,
) {
    if idx == axes.len() {
        outputs.push(current.clone());
        return;
    }
    for &value in &axes[idx] {
        current.push(value);
        expand_grid(axes, idx + 1, current, outputs);
        current.pop();
    }
}
