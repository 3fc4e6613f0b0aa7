//! Executor module for file operations

pub mod copy;
pub mod prune;
pub mod sync;
pub mod timestamp;

use crate::diff::ExtraEntries;
use crate::types::EntryKind;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Events emitted while the engine runs.
#[derive(Debug)]
pub enum SyncEvent<'a> {
    /// Destination already up to date.
    FileSkipped { path: &'a Path },
    /// File bytes were written; `elapsed` covers the transfer only.
    FileCopied {
        path: &'a Path,
        bytes: u64,
        elapsed: Duration,
    },
    /// Extra entries detected under one destination root.
    ExtrasFound { extras: &'a ExtraEntries },
    /// Deletion of extras is about to start.
    DeletionStarted,
    ExtraDeleted { path: &'a Path },
    /// Deletion failed; reconciliation continues.
    DeleteFailed {
        path: &'a Path,
        kind: EntryKind,
        error: &'a io::Error,
    },
}

/// Optional callback used to receive engine events.
pub type EventCallback<'a> = dyn Fn(&SyncEvent<'_>) + Send + Sync + 'a;

pub use copy::copy_file;
pub use prune::{reconcile, DeleteFailure, PruneReport};
pub use sync::synchronize;
pub use timestamp::sanitize_mtime;

fn emit_event(on_event: Option<&EventCallback<'_>>, event: SyncEvent<'_>) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
