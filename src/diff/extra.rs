//! Extra-entry detection: destination paths with no source counterpart

use crate::types::SmartCopyError;
use ignore::{DirEntry, Walk, WalkBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Extra file found in the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Result of diffing a destination tree against its source tree.
///
/// Extra directories are recorded once; nothing below them is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraEntries {
    pub files: Vec<ExtraFile>,
    pub dirs: Vec<PathBuf>,

    /// Destination entries skipped because they could not be read
    pub unreadable: usize,
}

impl ExtraEntries {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len()
    }

    /// Total size of the extra files
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Walker without any ignore-file filtering, hidden files included, in
/// file-name order.
fn plain_walk(root: &Path, follow_links: bool) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(follow_links)
        .sort_by_file_name(|a, b| a.cmp(b));
    builder
}

fn relative_to(root: &Path, entry: &DirEntry) -> Option<PathBuf> {
    entry.path().strip_prefix(root).ok().map(Path::to_path_buf)
}

/// Collect every path below `root` (files and directories, root excluded),
/// relative to `root`.
///
/// Symlinks are followed, matching the copy phase which mirrors a linked
/// directory as a real one.
pub fn collect_relative_paths(root: &Path) -> Result<HashSet<PathBuf>, SmartCopyError> {
    let mut paths = HashSet::new();

    for result in plain_walk(root, true).build() {
        let entry = result.map_err(|e| {
            SmartCopyError::access("walk source directory", root, ignore_to_io(e))
        })?;
        if entry.depth() == 0 {
            continue;
        }
        if let Some(relative) = relative_to(root, &entry) {
            paths.insert(relative);
        }
    }

    Ok(paths)
}

/// Find destination entries with no counterpart in `source_paths`.
///
/// Unreadable destination entries are skipped with a warning and counted.
/// An extra directory is filtered out of the walk, so nothing below it is
/// read.
pub fn find_extra_entries(source_paths: &HashSet<PathBuf>, dest_root: &Path) -> ExtraEntries {
    let mut extras = ExtraEntries::default();
    let extra_dirs = Arc::new(Mutex::new(Vec::new()));

    for result in pruned_walk(source_paths, dest_root, Arc::clone(&extra_dirs)) {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %dest_root.display(), error = %e, "skipping unreadable destination entry");
                extras.unreadable += 1;
                continue;
            }
        };
        if entry.depth() == 0 || entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        let Some(relative) = relative_to(dest_root, &entry) else {
            continue;
        };
        if source_paths.contains(&relative) {
            continue;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable destination entry");
                extras.unreadable += 1;
                continue;
            }
        };
        tracing::debug!(path = %entry.path().display(), size, "extra file");
        extras.files.push(ExtraFile {
            path: entry.path().to_path_buf(),
            size,
        });
    }

    if let Ok(mut dirs) = extra_dirs.lock() {
        extras.dirs = std::mem::take(&mut *dirs);
    }
    extras
}

/// Destination walk that drops extra directories before descending.
///
/// Each dropped directory is pushed onto `extra_dirs` in walk order.
fn pruned_walk(
    source_paths: &HashSet<PathBuf>,
    dest_root: &Path,
    extra_dirs: Arc<Mutex<Vec<PathBuf>>>,
) -> Walk {
    let known = Arc::new(source_paths.clone());
    let root = dest_root.to_path_buf();

    let mut builder = plain_walk(dest_root, false);
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        let is_extra = entry
            .path()
            .strip_prefix(&root)
            .is_ok_and(|relative| !known.contains(relative));
        if is_extra {
            tracing::debug!(path = %entry.path().display(), "extra directory");
            if let Ok(mut dirs) = extra_dirs.lock() {
                dirs.push(entry.path().to_path_buf());
            }
        }
        !is_extra
    });
    builder.build()
}

fn ignore_to_io(error: ignore::Error) -> std::io::Error {
    match error.into_io_error() {
        Some(io) => io,
        None => std::io::Error::other("directory walk failed"),
    }
}
