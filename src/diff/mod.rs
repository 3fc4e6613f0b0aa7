//! Diff logic - Freshness decisions and extra-entry detection

mod compare;
mod extra;

pub use compare::{is_stale, mtime_drift, needs_update, MTIME_TOLERANCE};
pub use extra::{collect_relative_paths, find_extra_entries, ExtraEntries, ExtraFile};
