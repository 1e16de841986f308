//! Asset constants and environment configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Data directory below the package root.
pub const C_DIR_DATA: &str = "data";
/// Flag icons directory below the data directory.
pub const C_DIR_FLAGS: &str = "flags";
/// Translations directory below the data directory.
pub const C_DIR_TRANSLATIONS: &str = "translations";

/// Flag icons source below the vendor root.
pub const C_PATH_VENDOR_FLAGS: &str = "components/flag-icon-css/flags";
/// Translation list packages live at `<vendor>/umpirsky/<type>-list/data`.
pub const C_DIR_VENDOR_TRANSLATIONS_ORG: &str = "umpirsky";
/// Translation categories vendored into the data directory.
pub const TUP_TRANSLATION_TYPES: [&str; 3] = ["countries", "languages", "currencies"];
/// Only translation tables in this format are vendored.
pub const C_EXT_TRANSLATIONS: &str = "php";

/// Sub-paths whose presence marks a vendor root as the right one.
pub const TUP_VENDOR_MARKERS: [&str; 2] = [
    C_PATH_VENDOR_FLAGS,
    "umpirsky/countries-list/data",
];

/// Environment variable naming the package root.
pub const C_ENV_PACKAGE_ROOT: &str = "ISOKIT_PACKAGE_ROOT";
/// Environment variable enabling dry-run (`1` or `true`).
pub const C_ENV_DRY_RUN: &str = "ISOKIT_DRY_RUN";
/// Environment variable bounding worker threads.
pub const C_ENV_WORKERS: &str = "ISOKIT_WORKERS";

/// Options for `ensure_data_files`.
#[derive(Debug, Clone)]
pub struct SpecEnsureOptions {
    /// Root of the package whose data directory is populated.
    pub path_dir_package_root: PathBuf,
    /// Override for `<root>/data`.
    pub path_dir_data: Option<PathBuf>,
    /// Maximum worker threads across copy tasks.
    pub num_workers_max: Option<usize>,
    /// Report what would be copied without writing.
    pub if_dry_run: bool,
}

impl SpecEnsureOptions {
    pub fn new(path_dir_package_root: impl Into<PathBuf>) -> Self {
        Self {
            path_dir_package_root: path_dir_package_root.into(),
            path_dir_data: None,
            num_workers_max: None,
            if_dry_run: false,
        }
    }

    /// Effective data directory.
    pub fn path_dir_data(&self) -> PathBuf {
        self.path_dir_data
            .clone()
            .unwrap_or_else(|| self.path_dir_package_root.join(C_DIR_DATA))
    }

    /// Read options from the process environment; the package root defaults
    /// to the current directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path_dir_cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(path_dir_cwd, |key| std::env::var(key).ok())
    }

    /// Read options through `fn_lookup` instead of the process environment.
    pub fn from_lookup<F>(path_dir_default_root: PathBuf, fn_lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path_dir_package_root = fn_lookup(C_ENV_PACKAGE_ROOT)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(path_dir_default_root);

        let if_dry_run = match fn_lookup(C_ENV_DRY_RUN) {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "" | "0" | "false" | "no" => false,
                "1" | "true" | "yes" => true,
                _ => return Err(ConfigError::InvalidValue { key: C_ENV_DRY_RUN, value: v }),
            },
        };

        let num_workers_max = match fn_lookup(C_ENV_WORKERS) {
            None => None,
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n >= 1 => Some(n),
                _ => return Err(ConfigError::InvalidValue { key: C_ENV_WORKERS, value: v }),
            },
        };

        Ok(Self {
            path_dir_package_root,
            path_dir_data: None,
            num_workers_max,
            if_dry_run,
        })
    }
}

/// Invalid environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("Invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
}
