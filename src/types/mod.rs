//! Core type definitions for smartcopy

mod entry;
mod error;
mod stats;

pub use entry::{Entry, EntryKind};
pub use error::SmartCopyError;
pub use stats::{bytes_per_second, CopyStats, MIN_ELAPSED};
