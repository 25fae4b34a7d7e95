use serde::{Deserialize, Serialize};

/// Named sweep dimension sampled between `min` and `max` (inclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Column name in the parameter table and default overlay key.
    pub name: String,
    /// Lower endpoint.
    pub min: f64,
    /// Upper endpoint.
    pub max: f64,
    /// Number of evenly spaced points, endpoints included.
    pub samples: usize,
}

impl ParameterRange {
    /// Creates a new range descriptor.
    pub fn new(name: impl Into<String>, min: f64, max: f64, samples: usize) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            samples,
        }
    }
}

/// Maps a parameter table column onto a nested key inside a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayTarget {
    /// Column of the parameter table supplying the value.
    pub column: String,
    /// Key path from the document root to the overwritten leaf.
    pub path: Vec<String>,
}

impl OverlayTarget {
    /// Targets `section/.../column` using the column name as the leaf key.
    pub fn under(section: &[String], column: impl Into<String>) -> Self {
        let column = column.into();
        let mut path = section.to_vec();
        path.push(column.clone());
        Self { column, path }
    }

    /// Dotted rendering of the key path used in diagnostics.
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

/// Handling applied to simulator runs that exit unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the outcome without logging it.
    #[default]
    Ignore,
    /// Log every failed run at warn level.
    Report,
}

/// File name of the materialized simulator input for row `id`.
pub fn config_file_name(id: u64) -> String {
    format!("input_{id}.yml")
}
