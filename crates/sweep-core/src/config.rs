use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::SweepError;
use crate::serde::{from_yaml_slice, to_yaml_string};
use crate::types::{FailurePolicy, OverlayTarget, ParameterRange};

/// Section of the simulator input that holds the immunity parameters.
pub const DEFAULT_SECTION: &str = "immune_system_parameters";

/// Complete description of one parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Swept dimensions, outermost first.
    #[serde(default = "default_parameters")]
    pub parameters: Vec<ParameterRange>,
    /// Where row values land inside the template.
    #[serde(default)]
    pub overlay: OverlaySpec,
    /// Input and output file locations.
    #[serde(default)]
    pub paths: PathsSpec,
    /// External simulator installation.
    #[serde(default)]
    pub simulator: SimulatorSpec,
    /// Worker pool settings.
    #[serde(default)]
    pub dispatch: DispatchSpec,
    /// Directory containing the config on disk (ignored when serializing).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_parameters() -> Vec<ParameterRange> {
    vec![
        ParameterRange::new("max_clinical_probability", 0.9, 0.99, 10),
        ParameterRange::new("immune_effect_on_progression_to_clinical", 3.0, 6.0, 10),
        ParameterRange::new("mid_point", 0.1, 0.4, 10),
    ]
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            parameters: default_parameters(),
            overlay: OverlaySpec::default(),
            paths: PathsSpec::default(),
            simulator: SimulatorSpec::default(),
            dispatch: DispatchSpec::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

/// Overlay placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySpec {
    /// Key path of the section receiving every swept parameter.
    #[serde(default = "default_section")]
    pub section: Vec<String>,
    /// Explicit column to key mappings; replaces the section rule when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<OverlayTarget>,
}

fn default_section() -> Vec<String> {
    vec![DEFAULT_SECTION.to_string()]
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            section: default_section(),
            targets: Vec::new(),
        }
    }
}

/// File locations, relative entries resolve against the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSpec {
    /// Parameter table written by the generator.
    #[serde(default = "default_params")]
    pub params: PathBuf,
    /// Template simulator input.
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Directory receiving `input_{id}.yml` files.
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,
}

fn default_params() -> PathBuf {
    PathBuf::from("params.csv")
}

fn default_template() -> PathBuf {
    PathBuf::from("input.yml")
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PathsSpec {
    fn default() -> Self {
        Self {
            params: default_params(),
            template: default_template(),
            output_dir: default_dir(),
        }
    }
}

/// Simulator binary and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorSpec {
    /// Executable; relative paths resolve against `working_dir`.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Working directory for every simulator process.
    #[serde(default = "default_dir")]
    pub working_dir: PathBuf,
}

fn default_binary() -> PathBuf {
    PathBuf::from("./malasim")
}

impl Default for SimulatorSpec {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            working_dir: default_dir(),
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSpec {
    /// Maximum number of concurrent simulator processes.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Handling of unsuccessful runs.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Additional launches allowed for a failing run.
    #[serde(default)]
    pub max_retries: u32,
}

fn default_workers() -> usize {
    4
}

impl Default for DispatchSpec {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            failure_policy: FailurePolicy::default(),
            max_retries: 0,
        }
    }
}

impl SweepConfig {
    /// Returns a default config whose relative paths resolve against `base_dir`.
    pub fn rooted_at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Ranges consumed by the grid generator.
    pub fn ranges(&self) -> &[ParameterRange] {
        &self.parameters
    }

    /// Overlay targets, one per swept parameter unless listed explicitly.
    pub fn overlay_targets(&self) -> Vec<OverlayTarget> {
        if !self.overlay.targets.is_empty() {
            return self.overlay.targets.clone();
        }
        self.parameters
            .iter()
            .map(|param| OverlayTarget::under(&self.overlay.section, param.name.clone()))
            .collect()
    }

    /// Resolved path of the parameter table.
    pub fn params_path(&self) -> PathBuf {
        self.resolve(&self.paths.params)
    }

    /// Resolved path of the template input.
    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.paths.template)
    }

    /// Resolved directory for materialized inputs.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output_dir)
    }

    /// Resolved simulator working directory.
    pub fn simulator_dir(&self) -> PathBuf {
        self.resolve(&self.simulator.working_dir)
    }

    /// Produces the YAML representation of the config.
    pub fn to_yaml_string(&self) -> Result<String, SweepError> {
        to_yaml_string(self)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Loads a sweep config from disk and records its directory for path resolution.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SweepConfig, SweepError> {
    let config_path = path.as_ref();
    let bytes =
        fs::read(config_path).map_err(|err| SweepError::io("config_read", config_path, err))?;
    let mut config: SweepConfig = from_yaml_slice(&bytes)
        .map_err(|err| SweepError::Config(err.info().clone().with_path(config_path)))?;
    config.base_dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(config)
}
