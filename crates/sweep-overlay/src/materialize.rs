use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use sweep_core::serde::to_yaml_string;
use sweep_core::{config_file_name, OverlayTarget, SweepConfig, SweepError};
use sweep_grid::{ParameterRow, ParameterTable};

use crate::overlay::{apply_overlay, load_template};

/// Writes one simulator input per parameter row.
#[derive(Debug, Clone)]
pub struct Materializer {
    template: PathBuf,
    targets: Vec<OverlayTarget>,
    out_dir: PathBuf,
}

impl Materializer {
    /// Creates a materializer for an explicit template, target set and output directory.
    pub fn new(
        template: impl Into<PathBuf>,
        targets: Vec<OverlayTarget>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template: template.into(),
            targets,
            out_dir: out_dir.into(),
        }
    }

    /// Builds a materializer from the resolved paths and targets of a sweep config.
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(config.template_path(), config.overlay_targets(), config.output_dir())
    }

    /// Template document path.
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Directory receiving `input_{id}.yml` files.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path the input for `id` is written to.
    pub fn output_path(&self, id: u64) -> PathBuf {
        self.out_dir.join(config_file_name(id))
    }

    /// Materializes a single row, creating the output directory if needed.
    ///
    /// The template is parsed from disk on every call so no row ever sees
    /// another row's overlay.
    pub fn materialize_row(&self, row: &ParameterRow) -> Result<PathBuf, SweepError> {
        let mut doc = load_template(&self.template)?;
        apply_overlay(&mut doc, row, &self.targets)?;
        fs::create_dir_all(&self.out_dir)
            .map_err(|err| SweepError::io("output_dir", &self.out_dir, err))?;
        let out = self.output_path(row.id);
        let yaml = to_yaml_string(&doc)?;
        fs::write(&out, yaml).map_err(|err| SweepError::io("input_write", &out, err))?;
        info!(
            "Created {} with parameters: {}",
            config_file_name(row.id),
            describe(row, &self.targets)
        );
        Ok(out)
    }

    /// Materializes every row in table order, stopping at the first failure.
    pub fn materialize_all(&self, table: &ParameterTable) -> Result<Vec<PathBuf>, SweepError> {
        let mut written = Vec::with_capacity(table.len());
        for row in &table.rows {
            written.push(self.materialize_row(row)?);
        }
        info!(
            "materialized {} inputs into {}",
            written.len(),
            self.out_dir.display()
        );
        Ok(written)
    }
}

fn describe(row: &ParameterRow, targets: &[OverlayTarget]) -> String {
    targets
        .iter()
        .filter_map(|target| {
            row.value(&target.column)
                .map(|value| format!("{}={}", target.dotted(), value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
