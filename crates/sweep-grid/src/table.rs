use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sweep_core::{ErrorInfo, SweepError};

/// Name of the identifier column.
pub const ID_COLUMN: &str = "id";

/// One parameter combination with its sweep identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRow {
    /// Sequential identifier shared with `input_{id}.yml` and `-j {id}`.
    pub id: u64,
    /// Parameter values keyed by column name, in column order.
    pub values: IndexMap<String, f64>,
}

impl ParameterRow {
    /// Creates a row from its identifier and values.
    pub fn new(id: u64, values: IndexMap<String, f64>) -> Self {
        Self { id, values }
    }

    /// Returns the value stored under `column`.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// Ordered parameter table as persisted to `params.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    /// Parameter column names, excluding `id`.
    pub columns: Vec<String>,
    /// Rows in generation order.
    pub rows: Vec<ParameterRow>,
}

impl ParameterTable {
    /// Creates a table from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<ParameterRow>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row identifiers in table order.
    pub fn ids(&self) -> Vec<u64> {
        self.rows.iter().map(|row| row.id).collect()
    }

    /// Looks up a row by identifier.
    pub fn row(&self, id: u64) -> Option<&ParameterRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}

fn csv_error(code: &str, path: &Path, err: csv::Error) -> SweepError {
    if err.is_io_error() {
        SweepError::io(code, path, err)
    } else {
        SweepError::Table(ErrorInfo::new(code, err.to_string()).with_path(path))
    }
}

/// Writes the table as CSV, replacing any existing file at `path`.
pub fn write_table(table: &ParameterTable, path: &Path) -> Result<(), SweepError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| SweepError::io("table_dir", parent, err))?;
        }
    }
    let mut wtr = csv::Writer::from_path(path).map_err(|err| csv_error("table_open", path, err))?;
    let header = std::iter::once(ID_COLUMN).chain(table.columns.iter().map(String::as_str));
    wtr.write_record(header)
        .map_err(|err| csv_error("table_write", path, err))?;
    for row in &table.rows {
        let mut record = Vec::with_capacity(table.columns.len() + 1);
        record.push(row.id.to_string());
        for column in &table.columns {
            let value = row.value(column).ok_or_else(|| {
                SweepError::Table(
                    ErrorInfo::new("table_missing_value", "row has no value for column")
                        .with_context("id", row.id.to_string())
                        .with_context("column", column.clone()),
                )
            })?;
            record.push(format!("{:?}", value));
        }
        wtr.write_record(&record)
            .map_err(|err| csv_error("table_write", path, err))?;
    }
    wtr.flush().map_err(|err| SweepError::io("table_flush", path, err))?;
    Ok(())
}

/// Reads a parameter table, coercing `id` to an integer and every other column to `f64`.
pub fn read_table(path: &Path) -> Result<ParameterTable, SweepError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|err| csv_error("table_open", path, err))?;
    let headers = rdr
        .headers()
        .map_err(|err| csv_error("table_header", path, err))?
        .clone();
    let id_index = headers
        .iter()
        .position(|name| name.trim() == ID_COLUMN)
        .ok_or_else(|| {
            SweepError::Table(
                ErrorInfo::new("table_missing_id", "parameter table has no id column")
                    .with_path(path)
                    .with_hint("regenerate the table with the generate stage"),
            )
        })?;
    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != id_index)
        .map(|(idx, name)| (idx, name.trim().to_string()))
        .collect();

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|err| csv_error("table_record", path, err))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();
        let id = coerce_id(cell(id_index)).ok_or_else(|| {
            invalid_cell(path, line, ID_COLUMN, cell(id_index))
        })?;
        let mut values = IndexMap::with_capacity(columns.len());
        for (idx, name) in &columns {
            let value: f64 = cell(*idx)
                .parse()
                .map_err(|_| invalid_cell(path, line, name, cell(*idx)))?;
            values.insert(name.clone(), value);
        }
        rows.push(ParameterRow::new(id, values));
    }
    Ok(ParameterTable::new(
        columns.into_iter().map(|(_, name)| name).collect(),
        rows,
    ))
}

/// Integer identifiers may be stored as `7` or `7.0`; fractional parts are truncated.
fn coerce_id(text: &str) -> Option<u64> {
    if let Ok(id) = text.parse::<u64>() {
        return Some(id);
    }
    let value: f64 = text.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}

fn invalid_cell(path: &Path, line: usize, column: &str, text: &str) -> SweepError {
    SweepError::Table(
        ErrorInfo::new("table_coerce", "cell is not numeric")
            .with_path(path)
            .with_context("row", line.to_string())
            .with_context("column", column.to_string())
            .with_context("value", text.to_string()),
    )
}
