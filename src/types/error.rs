//! Error types for smartcopy

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for smartcopy operations
#[derive(Debug, Error)]
pub enum SmartCopyError {
    /// A source path given on the command line does not exist
    #[error("source '{}' does not exist", .path.display())]
    MissingSource { path: PathBuf },

    /// stat/open/mkdir/readdir failure other than a missing source
    #[error("failed to {action} '{}': {source}", .path.display())]
    Access {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read or write failure while streaming file content
    #[error(
        "failed to copy file content from '{}' to '{}': {source}",
        .src.display(),
        .dest.display()
    )]
    Transfer {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failure to set timestamps
    #[error("failed to set times for '{}': {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Wrong argument shape
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl SmartCopyError {
    pub fn access(action: &'static str, path: &Path, source: io::Error) -> Self {
        SmartCopyError::Access {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn transfer(src: &Path, dest: &Path, source: io::Error) -> Self {
        SmartCopyError::Transfer {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            source,
        }
    }

    pub fn metadata(path: &Path, source: io::Error) -> Self {
        SmartCopyError::Metadata {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Check if this error was raised before any work started because of bad input
    pub fn is_invalid_arguments(&self) -> bool {
        matches!(self, SmartCopyError::InvalidArguments(_))
    }

    pub fn is_missing_source(&self) -> bool {
        matches!(self, SmartCopyError::MissingSource { .. })
    }

    /// Check if this error wraps an underlying system I/O error
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            SmartCopyError::Access { .. }
                | SmartCopyError::Transfer { .. }
                | SmartCopyError::Metadata { .. }
        )
    }

    /// Path the error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            SmartCopyError::MissingSource { path }
            | SmartCopyError::Access { path, .. }
            | SmartCopyError::Metadata { path, .. } => Some(path.as_path()),
            SmartCopyError::Transfer { dest, .. } => Some(dest.as_path()),
            SmartCopyError::InvalidArguments(_) => None,
        }
    }
}
