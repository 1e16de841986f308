//! Sync report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::{EnumSyncOutcome, SpecCopyTask, SpecSyncEntry, SyncError};

////////////////////////////////////////////////////////////////////////////////
// #region ReportSync

/// Aggregate counters and per-file outcomes for one `sync_dir` run.
#[derive(Debug, Default, Clone)]
pub struct ReportSync {
    /// Files copied (or that would be copied in dry-run).
    pub cnt_copied: u64,
    /// Files left alone because the destination mtime already matches.
    pub cnt_skipped: u64,
    /// Files ignored by the extension filter.
    pub cnt_filtered: u64,
    /// Per-file decisions in traversal order.
    pub l_entries: Vec<SpecSyncEntry>,
    /// Non-fatal source-side read warnings.
    pub warnings: Vec<String>,
    /// Whether the run performed no writes.
    pub if_dry_run: bool,
}

impl ReportSync {
    /// Relative paths with the given outcome.
    pub fn paths_with(&self, outcome: EnumSyncOutcome) -> Vec<&PathBuf> {
        self.l_entries
            .iter()
            .filter(|e| e.outcome == outcome)
            .map(|e| &e.path_rel)
            .collect()
    }

    /// Relative paths that were copied.
    pub fn paths_copied(&self) -> Vec<&PathBuf> {
        self.paths_with(EnumSyncOutcome::Copied)
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_filtered".to_string(), self.cnt_filtered);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let c_dry_run = if self.if_dry_run { " (dry-run)" } else { "" };
        format!(
            "{prefix} copied={} skipped={} filtered={} warnings={}{c_dry_run}",
            self.cnt_copied,
            self.cnt_skipped,
            self.cnt_filtered,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SYNC]"))
    }
}

/// Mutable accumulator for sync statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportSyncBuilder {
    l_entries: Vec<SpecSyncEntry>,
    warnings: Vec<String>,
    if_dry_run: bool,
}

impl ReportSyncBuilder {
    pub fn new(if_dry_run: bool) -> Self {
        Self {
            if_dry_run,
            ..Self::default()
        }
    }

    /// Record one per-file outcome.
    pub fn add_entry(&mut self, path_rel: PathBuf, outcome: EnumSyncOutcome) {
        self.l_entries.push(SpecSyncEntry { path_rel, outcome });
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportSync {
        let count = |outcome: EnumSyncOutcome| {
            self.l_entries
                .iter()
                .filter(|e| e.outcome == outcome)
                .count() as u64
        };
        ReportSync {
            cnt_copied: count(EnumSyncOutcome::Copied),
            cnt_skipped: count(EnumSyncOutcome::SkippedUnchanged),
            cnt_filtered: count(EnumSyncOutcome::SkippedFiltered),
            if_dry_run: self.if_dry_run,
            warnings: self.warnings,
            l_entries: self.l_entries,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportRun

/// Result of one [`SpecCopyTask`] inside a batch.
#[derive(Debug)]
pub struct SpecTaskOutcome {
    /// The task that was run.
    pub task: SpecCopyTask,
    /// Report on success, or the condition that stopped the task.
    pub result: Result<ReportSync, SyncError>,
}

impl SpecTaskOutcome {
    /// `true` when the task aborted with a copy failure.
    pub fn is_failed(&self) -> bool {
        matches!(&self.result, Err(e) if !e.is_source_missing())
    }

    /// `true` when the task was skipped because its source is absent.
    pub fn is_source_missing(&self) -> bool {
        matches!(&self.result, Err(e) if e.is_source_missing())
    }
}

/// Aggregated outcomes of a `run_copy_tasks` batch, in input order.
#[derive(Debug, Default)]
pub struct ReportRun {
    pub l_outcomes: Vec<SpecTaskOutcome>,
}

impl ReportRun {
    /// Total files copied over all successful tasks.
    pub fn cnt_copied(&self) -> u64 {
        self.l_outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.cnt_copied)
            .sum()
    }

    /// Total files skipped as unchanged over all successful tasks.
    pub fn cnt_skipped(&self) -> u64 {
        self.l_outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.cnt_skipped)
            .sum()
    }

    /// Number of tasks aborted by a copy failure.
    pub fn cnt_failed(&self) -> usize {
        self.l_outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Number of tasks whose source directory was missing.
    pub fn cnt_source_missing(&self) -> usize {
        self.l_outcomes
            .iter()
            .filter(|o| o.is_source_missing())
            .count()
    }

    /// No task failed. Missing sources do not count as failures.
    pub fn is_success(&self) -> bool {
        self.cnt_failed() == 0
    }

    /// Outcome for the task with the given label.
    pub fn outcome(&self, label: &str) -> Option<&SpecTaskOutcome> {
        self.l_outcomes.iter().find(|o| o.task.label == label)
    }
}

impl fmt::Display for ReportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[RUN] tasks={} copied={} skipped={} missing={} failed={}",
            self.l_outcomes.len(),
            self.cnt_copied(),
            self.cnt_skipped(),
            self.cnt_source_missing(),
            self.cnt_failed()
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
