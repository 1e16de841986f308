//! Dependency root resolution.
//!
//! Candidates are probed in order; the first existing directory that holds
//! at least one marker sub-path wins. No match is not an error: the fallback
//! is returned and a later `SourceMissing` reports the real problem.

use std::path::{Path, PathBuf};

/// Directory name dependencies are installed under.
pub const C_DIR_VENDOR: &str = "vendor";

/// Resolve a root against the real filesystem.
pub fn resolve_root<P, M>(candidates: &[P], markers: &[M], fallback: &Path) -> PathBuf
where
    P: AsRef<Path>,
    M: AsRef<Path>,
{
    resolve_root_with(candidates, markers, fallback, Path::is_dir, Path::exists)
}

/// Resolve a root with injected existence predicates.
///
/// `fn_is_dir` is asked about each candidate, `fn_exists` about each
/// `candidate/marker`. Nothing else is touched.
pub fn resolve_root_with<P, M, D, E>(
    candidates: &[P],
    markers: &[M],
    fallback: &Path,
    fn_is_dir: D,
    fn_exists: E,
) -> PathBuf
where
    P: AsRef<Path>,
    M: AsRef<Path>,
    D: Fn(&Path) -> bool,
    E: Fn(&Path) -> bool,
{
    for candidate in candidates {
        let path_candidate = candidate.as_ref();
        if !fn_is_dir(path_candidate) {
            continue;
        }
        if markers
            .iter()
            .any(|marker| fn_exists(&path_candidate.join(marker.as_ref())))
        {
            tracing::debug!(root = %path_candidate.display(), "Resolved dependency root");
            return path_candidate.to_path_buf();
        }
    }

    tracing::debug!(
        fallback = %fallback.display(),
        "No candidate root matched markers; using fallback"
    );
    fallback.to_path_buf()
}

/// Ordered vendor-directory candidates for a package rooted at
/// `path_dir_package_root`.
///
/// 1. `<root>/vendor` when the package is checked out on its own.
/// 2. `<root>/../..` when that directory is itself named `vendor`, i.e. the
///    package is installed as `vendor/<org>/<name>` inside a host project
///    and its dependencies are siblings.
pub fn derive_vendor_candidates(path_dir_package_root: &Path) -> Vec<PathBuf> {
    let mut l_candidates = vec![path_dir_package_root.join(C_DIR_VENDOR)];

    if let Some(path_dir_outer) = path_dir_package_root.parent().and_then(Path::parent)
        && path_dir_outer.file_name().is_some_and(|n| n == C_DIR_VENDOR)
    {
        l_candidates.push(path_dir_outer.to_path_buf());
    }
    l_candidates
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use super::{derive_vendor_candidates, resolve_root, resolve_root_with};

    struct FakeFs {
        set_dirs: HashSet<PathBuf>,
        set_paths: HashSet<PathBuf>,
    }

    impl FakeFs {
        fn new(dirs: &[&str], paths: &[&str]) -> Self {
            Self {
                set_dirs: dirs.iter().map(PathBuf::from).collect(),
                set_paths: paths.iter().map(PathBuf::from).collect(),
            }
        }

        fn resolve(&self, candidates: &[&str], markers: &[&str], fallback: &str) -> PathBuf {
            resolve_root_with(
                candidates,
                markers,
                Path::new(fallback),
                |p| self.set_dirs.contains(p),
                |p| self.set_paths.contains(p),
            )
        }
    }

    #[test]
    fn resolve_root_picks_first_candidate_with_marker() {
        let fake_fs = FakeFs::new(
            &["/a/vendor", "/b/vendor"],
            &["/a/vendor/x/flags", "/b/vendor/x/flags"],
        );
        let root = fake_fs.resolve(&["/a/vendor", "/b/vendor"], &["x/flags"], "/fb");
        assert_eq!(root, PathBuf::from("/a/vendor"));
    }

    #[test]
    fn resolve_root_skips_candidate_without_any_marker() {
        let fake_fs = FakeFs::new(&["/a/vendor", "/b/vendor"], &["/b/vendor/y/data"]);
        let root = fake_fs.resolve(
            &["/a/vendor", "/b/vendor"],
            &["x/flags", "y/data"],
            "/fb",
        );
        assert_eq!(root, PathBuf::from("/b/vendor"));
    }

    #[test]
    fn resolve_root_requires_candidate_directory() {
        // marker reported present but candidate itself is not a directory
        let fake_fs = FakeFs::new(&[], &["/a/vendor/x/flags"]);
        let root = fake_fs.resolve(&["/a/vendor"], &["x/flags"], "/fb");
        assert_eq!(root, PathBuf::from("/fb"));
    }

    #[test]
    fn resolve_root_falls_back_when_nothing_matches() {
        let fake_fs = FakeFs::new(&["/a/vendor"], &[]);
        assert_eq!(
            fake_fs.resolve(&["/a/vendor"], &["x/flags"], "/pkg/vendor"),
            PathBuf::from("/pkg/vendor")
        );
        assert_eq!(
            fake_fs.resolve(&[], &["x/flags"], "/pkg/vendor"),
            PathBuf::from("/pkg/vendor")
        );
    }

    #[test]
    fn resolve_root_on_real_filesystem() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path_a = tmp.path().join("a");
        let path_b = tmp.path().join("b");
        std::fs::create_dir_all(&path_a).expect("mkdir a");
        std::fs::create_dir_all(path_b.join("marker")).expect("mkdir b/marker");

        let root = resolve_root(&[&path_a, &path_b], &["marker"], tmp.path());
        assert_eq!(root, path_b);
    }

    #[test]
    fn vendor_candidates_standalone_checkout() {
        assert_eq!(
            derive_vendor_candidates(Path::new("/work/iso-countries")),
            vec![PathBuf::from("/work/iso-countries/vendor")]
        );
    }

    #[test]
    fn vendor_candidates_installed_as_dependency() {
        assert_eq!(
            derive_vendor_candidates(Path::new("/app/vendor/io238/iso-countries")),
            vec![
                PathBuf::from("/app/vendor/io238/iso-countries/vendor"),
                PathBuf::from("/app/vendor"),
            ]
        );
    }
}
