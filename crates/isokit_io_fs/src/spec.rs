//! Sync specification models and top-level error types.

use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Per-file outcome of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSyncOutcome {
    /// Destination was missing or its mtime differed; file was copied.
    Copied,
    /// Destination exists with the same mtime as the source.
    SkippedUnchanged,
    /// File extension did not match the configured filter.
    SkippedFiltered,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `sync_dir`.
#[derive(Debug, Clone, Default)]
pub struct SpecSyncOptions {
    /// Only files whose extension equals this value (case-sensitive, no dot)
    /// are synchronized.
    pub extension_filter: Option<String>,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

impl SpecSyncOptions {
    /// Options with an extension filter and no dry-run.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension_filter: Some(extension.into()),
            if_dry_run: false,
        }
    }
}

/// One regular file discovered under a source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFileEntry {
    /// Absolute (or caller-rooted) source path.
    pub path_file_src: PathBuf,
    /// Path relative to the walked source root.
    pub path_rel: PathBuf,
    /// Extension without the leading dot.
    pub extension: Option<String>,
    /// Last modification time of the source file.
    pub time_modified: FileTime,
}

impl SpecFileEntry {
    /// `true` when no filter is set or the extension matches it exactly.
    pub fn is_matching_extension(&self, extension_filter: Option<&str>) -> bool {
        match extension_filter {
            None => true,
            Some(ext) => self.extension.as_deref() == Some(ext),
        }
    }
}

/// One recorded per-file decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSyncEntry {
    /// Path relative to the source root.
    pub path_rel: PathBuf,
    /// What happened to the file.
    pub outcome: EnumSyncOutcome,
}

/// One synchronization unit: a source tree mirrored into a destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyTask {
    /// Source directory.
    pub path_dir_src: PathBuf,
    /// Destination directory.
    pub path_dir_dst: PathBuf,
    /// Human-readable category name used in log lines.
    pub label: String,
    /// Optional extension filter (see [`SpecSyncOptions::extension_filter`]).
    pub extension_filter: Option<String>,
}

impl SpecCopyTask {
    pub fn new(
        path_dir_src: impl Into<PathBuf>,
        path_dir_dst: impl Into<PathBuf>,
        label: impl Into<String>,
        extension_filter: Option<&str>,
    ) -> Self {
        Self {
            path_dir_src: path_dir_src.into(),
            path_dir_dst: path_dir_dst.into(),
            label: label.into(),
            extension_filter: extension_filter.map(str::to_string),
        }
    }

    /// Sync options for this task.
    pub fn to_sync_options(&self, if_dry_run: bool) -> SpecSyncOptions {
        SpecSyncOptions {
            extension_filter: self.extension_filter.clone(),
            if_dry_run,
        }
    }
}

/// Input options for `run_copy_tasks`.
#[derive(Debug, Clone, Default)]
pub struct SpecRunOptions {
    /// Maximum worker threads; `None` or `Some(1)` runs tasks serially.
    pub num_workers_max: Option<usize>,
    /// Forwarded to every task's [`SpecSyncOptions::if_dry_run`].
    pub if_dry_run: bool,
}

/// Errors raised by `sync_dir`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Source root is absent or not a directory. Recoverable: the task is
    /// skipped and nothing is written.
    #[error("Source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// I/O failure while creating a directory or copying a file. Aborts the
    /// current task.
    #[error("Failed to copy {}: {source}", path.display())]
    CopyFailed {
        /// Path that failed (destination file or directory).
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    pub(crate) fn copy_failed(path: &Path, source: io::Error) -> Self {
        Self::CopyFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    /// `true` for the recoverable [`SyncError::SourceMissing`] condition.
    pub fn is_source_missing(&self) -> bool {
        matches!(self, Self::SourceMissing(_))
    }

    /// Path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::SourceMissing(path) => path,
            Self::CopyFailed { path, .. } => path,
        }
    }
}

/// Source-side read failure met while walking a tree.
#[derive(Debug, Error)]
#[error("Failed to read {}: {source}", path.display())]
pub struct WalkError {
    /// Directory or entry that could not be read.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use filetime::FileTime;

    use super::{SpecFileEntry, SyncError};

    fn entry(extension: Option<&str>) -> SpecFileEntry {
        SpecFileEntry {
            path_file_src: PathBuf::from("/src/a"),
            path_rel: PathBuf::from("a"),
            extension: extension.map(str::to_string),
            time_modified: FileTime::zero(),
        }
    }

    #[test]
    fn extension_filter_is_exact_and_case_sensitive() {
        assert!(entry(Some("php")).is_matching_extension(None));
        assert!(entry(None).is_matching_extension(None));
        assert!(entry(Some("php")).is_matching_extension(Some("php")));
        assert!(!entry(Some("PHP")).is_matching_extension(Some("php")));
        assert!(!entry(Some("json")).is_matching_extension(Some("php")));
        assert!(!entry(None).is_matching_extension(Some("php")));
    }

    #[test]
    fn sync_error_reports_path_and_kind() {
        let err = SyncError::SourceMissing(PathBuf::from("/nope"));
        assert!(err.is_source_missing());
        assert_eq!(err.path(), PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Source directory not found: /nope");

        let err = SyncError::copy_failed(
            &PathBuf::from("/dst/x.php"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_source_missing());
        assert_eq!(err.to_string(), "Failed to copy /dst/x.php: denied");
    }
}
