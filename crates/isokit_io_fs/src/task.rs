//! Batch execution of independent copy tasks.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::report::{ReportRun, SpecTaskOutcome};
use crate::spec::{SpecCopyTask, SpecRunOptions};
use crate::sync::sync_dir;
use crate::util::calculate_worker_limit;

/// Run every task, isolating failures per task.
///
/// A missing source or a copy failure in one task never prevents the others
/// from running. Tasks write to disjoint destinations, so with more than one
/// worker they run on a rayon pool; outcomes are always returned in input
/// order.
pub fn run_copy_tasks(l_tasks: Vec<SpecCopyTask>, spec_run_options: &SpecRunOptions) -> ReportRun {
    run_copy_tasks_with_workers(
        l_tasks,
        calculate_worker_limit(spec_run_options.num_workers_max),
        spec_run_options.if_dry_run,
    )
}

/// Same as [`run_copy_tasks`] with an already-clamped worker count.
fn run_copy_tasks_with_workers(
    l_tasks: Vec<SpecCopyTask>,
    n_workers_max: usize,
    if_dry_run: bool,
) -> ReportRun {
    let run_one = |spec_task: SpecCopyTask| {
        let result = sync_dir(
            &spec_task.path_dir_src,
            &spec_task.path_dir_dst,
            &spec_task.to_sync_options(if_dry_run),
        );
        SpecTaskOutcome {
            task: spec_task,
            result,
        }
    };

    if n_workers_max <= 1 || l_tasks.len() <= 1 {
        return ReportRun {
            l_outcomes: l_tasks.into_iter().map(run_one).collect(),
        };
    }

    let thread_pool = ThreadPoolBuilder::new()
        .num_threads(n_workers_max)
        .build();
    let Ok(thread_pool) = thread_pool else {
        tracing::warn!(
            workers = n_workers_max,
            "Failed to initialize thread pool; fallback to serial sync."
        );
        return ReportRun {
            l_outcomes: l_tasks.into_iter().map(run_one).collect(),
        };
    };

    let l_outcomes = thread_pool.install(|| l_tasks.into_par_iter().map(run_one).collect());
    ReportRun { l_outcomes }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use filetime::{FileTime, set_file_mtime};
    use tempfile::TempDir;

    use super::{run_copy_tasks, run_copy_tasks_with_workers};
    use crate::spec::{SpecCopyTask, SpecRunOptions, SyncError};

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, txt).expect("write text");
    }

    fn build_tasks(root: &Path) -> Vec<SpecCopyTask> {
        write_text(&root.join("src/flags/de.svg"), "de");
        write_text(&root.join("src/countries/en/country.php"), "<?php");
        write_text(&root.join("src/countries/en/country.json"), "{}");
        write_text(&root.join("src/broken/x.php"), "x");
        set_file_mtime(root.join("src/broken/x.php"), FileTime::from_unix_time(100, 0))
            .expect("set mtime");
        std::fs::create_dir_all(root.join("dst/broken/x.php")).expect("mkdir");

        vec![
            SpecCopyTask::new(root.join("src/flags"), root.join("dst/flags"), "Flag icons", None),
            SpecCopyTask::new(
                root.join("src/missing"),
                root.join("dst/missing"),
                "Missing",
                Some("php"),
            ),
            SpecCopyTask::new(root.join("src/broken"), root.join("dst/broken"), "Broken", None),
            SpecCopyTask::new(
                root.join("src/countries"),
                root.join("dst/countries"),
                "Countries translations",
                Some("php"),
            ),
        ]
    }

    fn assert_isolated(root: &Path, report: &crate::report::ReportRun) {
        let l_labels = report
            .l_outcomes
            .iter()
            .map(|o| o.task.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            l_labels,
            vec!["Flag icons", "Missing", "Broken", "Countries translations"]
        );

        assert_eq!(report.cnt_copied(), 2);
        assert_eq!(report.cnt_source_missing(), 1);
        assert_eq!(report.cnt_failed(), 1);
        assert!(matches!(
            report.outcome("Broken").map(|o| &o.result),
            Some(Err(SyncError::CopyFailed { .. }))
        ));
        assert!(root.join("dst/flags/de.svg").exists());
        assert!(root.join("dst/countries/en/country.php").exists());
        assert!(!root.join("dst/countries/en/country.json").exists());
        assert!(!root.join("dst/missing").exists());
    }

    #[test]
    fn run_copy_tasks_serial_isolates_failures() {
        let tmp = TempDir::new().expect("tempdir");
        let l_tasks = build_tasks(tmp.path());
        let report = run_copy_tasks(l_tasks, &SpecRunOptions::default());
        assert_isolated(tmp.path(), &report);
    }

    #[test]
    fn run_copy_tasks_parallel_keeps_order_and_isolation() {
        let tmp = TempDir::new().expect("tempdir");
        let l_tasks = build_tasks(tmp.path());
        // bypasses the CPU clamp so the pool path runs on single-core hosts
        let report = run_copy_tasks_with_workers(l_tasks, 4, false);
        assert_isolated(tmp.path(), &report);
    }

    #[test]
    fn run_copy_tasks_parallel_dry_run_writes_nothing() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path();
        write_text(&root.join("src/a/a.php"), "a");
        write_text(&root.join("src/b/b.php"), "b");
        let l_tasks = vec![
            SpecCopyTask::new(root.join("src/a"), root.join("dst/a"), "A", None),
            SpecCopyTask::new(root.join("src/b"), root.join("dst/b"), "B", None),
        ];

        let report = run_copy_tasks_with_workers(l_tasks, 2, true);
        assert_eq!(report.cnt_copied(), 2);
        assert!(report.is_success());
        assert!(!root.join("dst").exists());
    }

    #[test]
    fn run_copy_tasks_clamps_requested_workers() {
        let tmp = TempDir::new().expect("tempdir");
        let l_tasks = build_tasks(tmp.path());
        let spec_run_options = SpecRunOptions {
            num_workers_max: Some(4),
            ..SpecRunOptions::default()
        };
        let report = run_copy_tasks(l_tasks, &spec_run_options);
        assert_isolated(tmp.path(), &report);
    }

    #[test]
    fn run_copy_tasks_empty_batch() {
        let report = run_copy_tasks(Vec::new(), &SpecRunOptions::default());
        assert!(report.l_outcomes.is_empty());
        assert!(report.is_success());
    }
}
