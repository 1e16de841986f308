//! `isokit_io_fs`:
//! Incremental vendoring of static data trees.
//!
//! - `locate` : dependency root resolution over ordered candidates
//! - `sync`   : filtered, mtime-based directory synchronization
//! - `task`   : batch runner for independent copy tasks
//! - `spec`   : options, value records, errors
//! - `report` : run-time report models
//! - `util`   : shared helper functions

pub mod locate;
pub mod report;
pub mod spec;
pub mod sync;
pub mod task;
mod util;

pub use locate::{derive_vendor_candidates, resolve_root, resolve_root_with};
pub use report::{ReportRun, ReportSync, ReportSyncBuilder, SpecTaskOutcome};
pub use spec::{
    EnumSyncOutcome, SpecCopyTask, SpecFileEntry, SpecRunOptions, SpecSyncEntry,
    SpecSyncOptions, SyncError, WalkError,
};
pub use sync::{IterFileEntries, sync_dir, walk_files};
pub use task::run_copy_tasks;
