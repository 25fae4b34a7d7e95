//! Parameter grid generation and the CSV parameter table shared by every sweep stage.

use std::path::Path;

use log::info;
use sweep_core::{ParameterRange, SweepError};

mod grid;
mod table;

pub use grid::{generate_grid, linspace};
pub use table::{read_table, write_table, ParameterRow, ParameterTable, ID_COLUMN};

/// Generates the full grid for `ranges` and persists it to `path`, replacing any previous table.
pub fn generate_to_path(
    ranges: &[ParameterRange],
    path: &Path,
) -> Result<ParameterTable, SweepError> {
    let table = generate_grid(ranges)?;
    write_table(&table, path)?;
    info!(
        "wrote {} parameter rows over {} columns to {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}
