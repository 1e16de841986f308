use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

////////////////////////////////////////////////////////////////////////////////
// #region Directories

/// Permission bits for directories created on the destination side.
pub(crate) const N_MODE_DIR_CREATE: u32 = 0o755;

/// Create `path` and any missing parents (mode 0755 on Unix).
pub(crate) fn ensure_directory_exists(path: &Path) -> Result<(), io::Error> {
    if path.is_dir() {
        return Ok(());
    }
    let mut dir_builder = fs::DirBuilder::new();
    dir_builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        dir_builder.mode(N_MODE_DIR_CREATE);
    }
    dir_builder.create(path)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileMetadata

/// Modification time of `path`, or `None` when it does not exist.
pub(crate) fn read_time_modified(path: &Path) -> Result<Option<FileTime>, io::Error> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(FileTime::from_last_modification_time(&meta))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Copy bytes, then pin the destination timestamps to the source's so the
/// next mtime comparison is stable.
///
/// An existing destination file is unlinked first so that a read-only copy
/// left by an earlier sync can be replaced.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    use filetime::set_file_times;

    remove_existing_file(path_file_dst)?;
    fs::copy(path_file_src, path_file_dst)?;

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    {
        fs::set_permissions(path_file_dst, stat_src.permissions())?;
        copy_xattrs_linux(path_file_src, path_file_dst);
    }
    Ok(())
}

fn remove_existing_file(path_file: &Path) -> Result<(), io::Error> {
    match fs::symlink_metadata(path_file) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => fs::remove_file(path_file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Workers

pub(crate) fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => 1,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
