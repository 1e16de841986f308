//! `isokit_assets`:
//! Populates a package's `data/` directory from its vendored dependencies.
//!
//! - `conf`   : asset constants and environment configuration
//! - `ensure` : asset table, orchestration, and log rendering

pub mod conf;
pub mod ensure;

pub use conf::{ConfigError, SpecEnsureOptions};
pub use ensure::{derive_copy_tasks, ensure_data_files, render_messages};
