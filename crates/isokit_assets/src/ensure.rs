//! Vendoring of flag icons and translation tables into the package data
//! directory.

use std::path::Path;

use isokit_io_fs::{
    ReportRun, SpecCopyTask, SpecRunOptions, SyncError, derive_vendor_candidates, resolve_root,
    run_copy_tasks,
};
use tracing::Level;

use crate::conf::{
    C_DIR_FLAGS, C_DIR_TRANSLATIONS, C_DIR_VENDOR_TRANSLATIONS_ORG, C_EXT_TRANSLATIONS,
    C_PATH_VENDOR_FLAGS, SpecEnsureOptions, TUP_TRANSLATION_TYPES, TUP_VENDOR_MARKERS,
};

/// Fixed asset table: flag icons (unfiltered) and one `.php` translation
/// task per translation type.
pub fn derive_copy_tasks(path_dir_vendor: &Path, path_dir_data: &Path) -> Vec<SpecCopyTask> {
    let mut l_tasks = vec![SpecCopyTask::new(
        path_dir_vendor.join(C_PATH_VENDOR_FLAGS),
        path_dir_data.join(C_DIR_FLAGS),
        "Flag icons",
        None,
    )];

    for c_type in TUP_TRANSLATION_TYPES {
        l_tasks.push(SpecCopyTask::new(
            path_dir_vendor
                .join(C_DIR_VENDOR_TRANSLATIONS_ORG)
                .join(format!("{c_type}-list"))
                .join("data"),
            path_dir_data.join(C_DIR_TRANSLATIONS).join(c_type),
            format!("{} translations", capitalize(c_type)),
            Some(C_EXT_TRANSLATIONS),
        ));
    }
    l_tasks
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the vendor root, sync every asset category, and log the outcome.
pub fn ensure_data_files(spec_ensure_options: &SpecEnsureOptions) -> ReportRun {
    let path_dir_root = &spec_ensure_options.path_dir_package_root;
    let path_dir_data = spec_ensure_options.path_dir_data();
    let path_dir_vendor = resolve_root(
        &derive_vendor_candidates(path_dir_root),
        &TUP_VENDOR_MARKERS,
        &path_dir_root.join(isokit_io_fs::locate::C_DIR_VENDOR),
    );
    tracing::info!(
        vendor = %path_dir_vendor.display(),
        data = %path_dir_data.display(),
        dry_run = spec_ensure_options.if_dry_run,
        "Ensuring data files"
    );

    let spec_run_options = SpecRunOptions {
        num_workers_max: spec_ensure_options.num_workers_max,
        if_dry_run: spec_ensure_options.if_dry_run,
    };
    let report_run = run_copy_tasks(
        derive_copy_tasks(&path_dir_vendor, &path_dir_data),
        &spec_run_options,
    );

    for (level, message) in render_messages(&report_run) {
        if level == Level::ERROR {
            tracing::error!("{message}");
        } else if level == Level::WARN {
            tracing::warn!("{message}");
        } else {
            tracing::info!("{message}");
        }
    }
    report_run
}

/// Human-readable log lines for a finished batch.
pub fn render_messages(report_run: &ReportRun) -> Vec<(Level, String)> {
    let mut l_messages = Vec::new();
    for spec_outcome in &report_run.l_outcomes {
        let label = &spec_outcome.task.label;
        match &spec_outcome.result {
            Ok(report_sync) => {
                let c_verb = if report_sync.if_dry_run {
                    "Would copy"
                } else {
                    "Copied"
                };
                for path_rel in report_sync.paths_copied() {
                    l_messages.push((
                        Level::INFO,
                        format!("{c_verb} {label} file: {}", path_rel.display()),
                    ));
                }
                for warning in &report_sync.warnings {
                    l_messages.push((Level::WARN, format!("{label}: {warning}")));
                }
            }
            Err(SyncError::SourceMissing(path)) => l_messages.push((
                Level::WARN,
                format!("Vendor {label} directory not found: {}", path.display()),
            )),
            Err(e) => l_messages.push((Level::ERROR, format!("Failed to sync {label}: {e}"))),
        }
    }
    l_messages
}
