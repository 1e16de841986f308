//! Incremental, filtered directory synchronization.
//!
//! A file is copied when the destination is missing or its mtime differs
//! from the source's in either direction. Identical mtimes are treated as
//! "already synced". Timestamps that drift without content changes (fresh
//! checkouts, filesystems with coarser mtime precision) cause a re-copy;
//! that over-copy is accepted.

use std::path::{Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use crate::report::{ReportSync, ReportSyncBuilder};
use crate::spec::{EnumSyncOutcome, SpecFileEntry, SpecSyncOptions, SyncError, WalkError};
use crate::util::{copy_file_with_metadata, ensure_directory_exists, read_time_modified};

////////////////////////////////////////////////////////////////////////////////
// #region Walk

/// Lazy depth-first walk over the regular files below a root.
///
/// Symlinks are not followed and, like special files, not yielded. Read
/// failures are yielded as [`WalkError`] and the walk continues.
#[derive(Debug)]
pub struct IterFileEntries {
    path_dir_root: PathBuf,
    iter_walk: walkdir::IntoIter,
}

/// Walk every regular file below `dir_source`.
pub fn walk_files<P: AsRef<Path>>(dir_source: P) -> IterFileEntries {
    let path_dir_root = dir_source.as_ref().to_path_buf();
    IterFileEntries {
        iter_walk: WalkDir::new(&path_dir_root).follow_links(false).into_iter(),
        path_dir_root,
    }
}

impl IterFileEntries {
    fn to_walk_error(&self, e: walkdir::Error) -> WalkError {
        let path = e
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.path_dir_root.clone());
        WalkError {
            path,
            source: e.into(),
        }
    }

    fn build_entry(&self, entry: &walkdir::DirEntry) -> Result<SpecFileEntry, WalkError> {
        let meta = entry.metadata().map_err(|e| self.to_walk_error(e))?;
        let path_file_src = entry.path().to_path_buf();
        let path_rel = path_file_src
            .strip_prefix(&self.path_dir_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
        let extension = path_file_src
            .extension()
            .map(|e| e.to_string_lossy().into_owned());

        Ok(SpecFileEntry {
            time_modified: FileTime::from_last_modification_time(&meta),
            path_file_src,
            path_rel,
            extension,
        })
    }
}

impl Iterator for IterFileEntries {
    type Item = Result<SpecFileEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.iter_walk.next()? {
                Ok(v) => v,
                Err(e) => return Some(Err(self.to_walk_error(e))),
            };
            if entry.file_type().is_file() {
                return Some(self.build_entry(&entry));
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Sync

/// Mirror the regular files of `dir_source` into `dir_destination`.
///
/// Returns [`SyncError::SourceMissing`] without touching the destination when
/// the source is not a directory. The first I/O failure on the destination
/// side aborts the run with [`SyncError::CopyFailed`]. Unreadable source
/// directories are recorded as report warnings.
pub fn sync_dir<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_sync_options: &SpecSyncOptions,
) -> Result<ReportSync, SyncError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref();
    let path_dir_dst = dir_destination.as_ref();

    if !path_dir_src.is_dir() {
        return Err(SyncError::SourceMissing(path_dir_src.to_path_buf()));
    }

    let if_dry_run = spec_sync_options.if_dry_run;
    if !if_dry_run {
        ensure_directory_exists(path_dir_dst)
            .map_err(|e| SyncError::copy_failed(path_dir_dst, e))?;
    }

    let mut builder_sync_report = ReportSyncBuilder::new(if_dry_run);
    for res_entry in walk_files(path_dir_src) {
        let spec_file_entry = match res_entry {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(path = %e.path.display(), "{e}");
                builder_sync_report.add_warning(e.to_string());
                continue;
            }
        };
        let outcome = handle_file_entry(&spec_file_entry, path_dir_dst, spec_sync_options)?;
        builder_sync_report.add_entry(spec_file_entry.path_rel, outcome);
    }
    Ok(builder_sync_report.build())
}

fn handle_file_entry(
    spec_file_entry: &SpecFileEntry,
    path_dir_dst: &Path,
    spec_sync_options: &SpecSyncOptions,
) -> Result<EnumSyncOutcome, SyncError> {
    if !spec_file_entry.is_matching_extension(spec_sync_options.extension_filter.as_deref()) {
        return Ok(EnumSyncOutcome::SkippedFiltered);
    }

    let path_file_dst = path_dir_dst.join(&spec_file_entry.path_rel);
    let time_modified_dst = read_time_modified(&path_file_dst)
        .map_err(|e| SyncError::copy_failed(&path_file_dst, e))?;
    if time_modified_dst == Some(spec_file_entry.time_modified) {
        tracing::trace!(path = %spec_file_entry.path_rel.display(), "Unchanged");
        return Ok(EnumSyncOutcome::SkippedUnchanged);
    }

    if !spec_sync_options.if_dry_run {
        if let Some(path_parent_dst) = path_file_dst.parent() {
            ensure_directory_exists(path_parent_dst)
                .map_err(|e| SyncError::copy_failed(path_parent_dst, e))?;
        }
        copy_file_with_metadata(&spec_file_entry.path_file_src, &path_file_dst)
            .map_err(|e| SyncError::copy_failed(&path_file_dst, e))?;
    }
    tracing::debug!(
        path = %spec_file_entry.path_rel.display(),
        dry_run = spec_sync_options.if_dry_run,
        "Copied"
    );
    Ok(EnumSyncOutcome::Copied)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
