#![deny(missing_docs)]
#![doc = "Shared error, configuration and serialization types for the immunity sweep driver."]

/// YAML sweep configuration and path resolution.
pub mod config;
pub mod errors;
/// Canonical hashing helpers.
pub mod hash;
/// Canonical JSON and YAML serde helpers.
pub mod serde;
mod types;

pub use config::{
    load_config, DispatchSpec, OverlaySpec, PathsSpec, SimulatorSpec, SweepConfig,
    DEFAULT_SECTION,
};
pub use errors::{ErrorInfo, SweepError};
pub use hash::stable_hash_string;
pub use types::{config_file_name, FailurePolicy, OverlayTarget, ParameterRange};
