//! # smartcopy - Directory Synchronization Copier
//!
//! Recursively mirrors files and directories, skipping files already up to
//! date by size and modification time, and optionally reports or deletes
//! destination entries that no longer exist in the source.

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, OutputMode, SyncOptions};
pub use types::{CopyStats, Entry, EntryKind, SmartCopyError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
