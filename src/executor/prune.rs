//! Extra-entry reconciliation: report and optionally delete orphans
//!
//! Unlike the copy phase, deletion is collect-and-continue: a failed delete is
//! reported and the remaining entries are still processed.

use super::{emit_event, EventCallback, SyncEvent};
use crate::config::SyncOptions;
use crate::diff::{collect_relative_paths, find_extra_entries, ExtraEntries};
use crate::types::{CopyStats, Entry, EntryKind, SmartCopyError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A delete that did not succeed
#[derive(Debug)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub error: io::Error,
}

/// Outcome of one reconciliation
#[derive(Debug, Default)]
pub struct PruneReport {
    pub extras: ExtraEntries,
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<DeleteFailure>,
}

/// Diff `dest_root` against `source_root` and handle the extras.
///
/// Does nothing unless detection is enabled and the source is a directory.
/// Only walking the source can fail; delete failures land in the report.
pub fn reconcile(
    source_root: &Path,
    dest_root: &Path,
    options: &SyncOptions,
    stats: &mut CopyStats,
    on_event: Option<&EventCallback<'_>>,
) -> Result<PruneReport, SmartCopyError> {
    let mut report = PruneReport::default();
    if !options.detect_extra {
        return Ok(report);
    }

    let source = Entry::stat(source_root)?;
    if !source.is_dir() {
        tracing::debug!(src = %source_root.display(), "single-file source, no extra-entry analysis");
        return Ok(report);
    }

    tracing::info!(src = %source_root.display(), dest = %dest_root.display(), "checking for extra entries");
    let source_paths = collect_relative_paths(source_root)?;
    report.extras = find_extra_entries(&source_paths, dest_root);

    for file in &report.extras.files {
        stats.record_extra_file(file.size);
    }
    for _ in &report.extras.dirs {
        stats.record_extra_dir();
    }

    if !report.extras.is_empty() {
        emit_event(on_event, SyncEvent::ExtrasFound { extras: &report.extras });
    }

    if options.delete_extra {
        delete_extras(&mut report, stats, on_event);
    }

    Ok(report)
}

/// Files first, individually; then directories with their whole subtree.
fn delete_extras(report: &mut PruneReport, stats: &mut CopyStats, on_event: Option<&EventCallback<'_>>) {
    if report.extras.is_empty() {
        return;
    }
    emit_event(on_event, SyncEvent::DeletionStarted);

    let files = report.extras.files.iter().map(|f| (f.path.as_path(), EntryKind::File));
    let dirs = report.extras.dirs.iter().map(|d| (d.as_path(), EntryKind::Directory));

    for (path, kind) in files.chain(dirs) {
        let result = match kind {
            EntryKind::File => fs::remove_file(path),
            EntryKind::Directory => fs::remove_dir_all(path),
        };

        match result {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "deleted extra {}", kind.label());
                stats.record_deleted();
                emit_event(on_event, SyncEvent::ExtraDeleted { path });
                report.deleted.push(path.to_path_buf());
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to delete extra {}", kind.label());
                emit_event(on_event, SyncEvent::DeleteFailed { path, kind, error: &error });
                report.failures.push(DeleteFailure {
                    path: path.to_path_buf(),
                    kind,
                    error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_pair(root: &Path) -> (PathBuf, PathBuf) {
        let src = root.join("src");
        let dest = root.join("dest");
        fs::create_dir_all(src.join("sub")).expect("create src");
        fs::create_dir_all(dest.join("sub")).expect("create dest sub");
        fs::create_dir_all(dest.join("stale/inner")).expect("create dest stale");
        fs::write(src.join("a.txt"), b"a").expect("write src a");
        fs::write(dest.join("a.txt"), b"a").expect("write dest a");
        fs::write(dest.join("sub/orphan.txt"), b"1234").expect("write orphan");
        fs::write(dest.join("stale/inner/x.bin"), b"xx").expect("write stale file");
        (src, dest)
    }

    #[test]
    fn test_detect_only_reports_without_deleting() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (src, dest) = build_pair(temp_dir.path());

        let mut stats = CopyStats::new();
        let report = reconcile(&src, &dest, &SyncOptions::new(true, false), &mut stats, None)
            .expect("reconcile");

        assert_eq!(report.extras.files.len(), 1);
        assert_eq!(report.extras.dirs, vec![dest.join("stale")]);
        assert!(report.deleted.is_empty());
        assert_eq!(stats.extra_found, 2);
        assert_eq!(stats.extra_bytes, 4);
        assert_eq!(stats.extra_deleted, 0);
        assert!(dest.join("sub/orphan.txt").exists());
        assert!(dest.join("stale").exists());
    }

    #[test]
    fn test_delete_removes_every_extra() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (src, dest) = build_pair(temp_dir.path());

        let mut stats = CopyStats::new();
        let report = reconcile(&src, &dest, &SyncOptions::new(false, true), &mut stats, None)
            .expect("reconcile");

        assert_eq!(report.deleted, vec![dest.join("sub/orphan.txt"), dest.join("stale")]);
        assert!(report.failures.is_empty());
        assert_eq!(stats.extra_deleted, 2);
        assert!(!dest.join("sub/orphan.txt").exists());
        assert!(!dest.join("stale").exists());
        assert!(dest.join("a.txt").exists());
        assert!(dest.join("sub").is_dir());
    }

    #[test]
    fn test_disabled_detection_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (src, dest) = build_pair(temp_dir.path());

        let mut stats = CopyStats::new();
        let report = reconcile(&src, &dest, &SyncOptions::default(), &mut stats, None)
            .expect("reconcile");

        assert!(report.extras.is_empty());
        assert_eq!(stats.extra_found, 0);
    }

    #[test]
    fn test_single_file_source_has_no_extras() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("b.txt");
        fs::write(&src, b"a").expect("write src");
        fs::write(&dest, b"a").expect("write dest");

        let mut stats = CopyStats::new();
        let report = reconcile(&src, &dest, &SyncOptions::new(true, true), &mut stats, None)
            .expect("reconcile");

        assert!(report.extras.is_empty());
        assert!(dest.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_delete_failure_does_not_abort() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(&src).expect("create src");
        fs::create_dir_all(dest.join("locked")).expect("create locked");
        fs::write(dest.join("locked/f.txt"), b"f").expect("write locked file");
        fs::write(dest.join("z.txt"), b"z").expect("write z");
        fs::create_dir_all(src.join("locked")).expect("mirror locked in src");
        // locked/f.txt is extra but its parent forbids unlinking
        fs::set_permissions(dest.join("locked"), fs::Permissions::from_mode(0o555))
            .expect("lock dir");

        let mut stats = CopyStats::new();
        let report = reconcile(&src, &dest, &SyncOptions::new(true, true), &mut stats, None)
            .expect("reconcile must not fail on delete errors");

        fs::set_permissions(dest.join("locked"), fs::Permissions::from_mode(0o755))
            .expect("unlock dir");

        assert!(report.deleted.contains(&dest.join("z.txt")));
        assert!(!dest.join("z.txt").exists());

        // Running as root ignores directory permissions
        if dest.join("locked/f.txt").exists() {
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].kind, EntryKind::File);
            assert_eq!(stats.extra_deleted, 1);
        }
    }
}
