//! Materializes per-row simulator inputs by overlaying sweep values onto a YAML template.

mod materialize;
mod overlay;

pub use materialize::Materializer;
pub use overlay::{apply_overlay, load_template};
