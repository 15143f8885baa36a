//! Infrastructure layer for filesystem and environment interactions.
//!
//! Per-user directories (via `dirs`) and expansion of `~` and environment
//! variables in item paths (via `shellexpand`).

pub mod paths;

pub use paths::{config_file, default_config_dir, expand_path, get_data_dir};
