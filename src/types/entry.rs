//! Entry - Read-only snapshot of one filesystem object

use super::SmartCopyError;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of filesystem object visited during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Short label used in reports
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
        }
    }
}

/// Snapshot of a filesystem object, taken once per visit
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Path the snapshot was taken from
    pub path: PathBuf,

    /// File or directory
    pub kind: EntryKind,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Last modification time
    pub mtime: SystemTime,

    /// Unix permissions (mode bits)
    pub permissions: u32,
}

impl Entry {
    /// Create a new file entry
    pub fn file(path: PathBuf, size: u64, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            size,
            mtime,
            permissions,
        }
    }

    /// Create a new directory entry
    pub fn directory(path: PathBuf, mtime: SystemTime, permissions: u32) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            size: 0,
            mtime,
            permissions,
        }
    }

    /// Stat `path` (following symlinks) and snapshot the result.
    pub fn stat(path: &Path) -> Result<Self, SmartCopyError> {
        let metadata = fs::metadata(path)
            .map_err(|e| SmartCopyError::access("get source info for", path, e))?;
        Self::from_metadata(path, &metadata)
    }

    /// Build an entry from already-fetched metadata.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Result<Self, SmartCopyError> {
        let mtime = metadata
            .modified()
            .map_err(|e| SmartCopyError::access("read modification time of", path, e))?;

        #[cfg(unix)]
        let permissions = {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o7777
        };

        #[cfg(not(unix))]
        let permissions = if metadata.is_dir() { 0o755 } else { 0o644 };

        if metadata.is_dir() {
            Ok(Self::directory(path.to_path_buf(), mtime, permissions))
        } else {
            Ok(Self::file(path.to_path_buf(), metadata.len(), mtime, permissions))
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
