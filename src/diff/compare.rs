//! Freshness comparison between a source entry and its destination path

use crate::executor::sanitize_mtime;
use crate::types::{Entry, SmartCopyError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Maximum mtime drift still treated as "same file".
///
/// FAT-family destinations store times at 2-second resolution; the rest is
/// clock-skew margin.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(5);

/// Decide whether `dest` must be (re)written from `src`.
///
/// 1. **Missing destination** → copy
/// 2. **Size mismatch** → copy
/// 3. **mtime drift** greater than [`MTIME_TOLERANCE`] → copy
///
/// The destination is compared against the sanitized source mtime, the value
/// a copy would have written. Permission bits are not part of the decision. Any stat failure other than
/// not-found is returned as an access error.
pub fn needs_update(src: &Entry, dest: &Path) -> Result<bool, SmartCopyError> {
    let dest_metadata = match fs::metadata(dest) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => {
            return Err(SmartCopyError::access(
                "get destination file info for",
                dest,
                e,
            ))
        }
    };

    let dest_mtime = dest_metadata
        .modified()
        .map_err(|e| SmartCopyError::access("read modification time of", dest, e))?;

    Ok(is_stale(
        src.size,
        sanitize_mtime(src.mtime),
        dest_metadata.len(),
        dest_mtime,
    ))
}

/// Pure part of [`needs_update`], for an existing destination.
pub fn is_stale(src_size: u64, src_mtime: SystemTime, dest_size: u64, dest_mtime: SystemTime) -> bool {
    if src_size != dest_size {
        return true;
    }
    mtime_drift(src_mtime, dest_mtime) > MTIME_TOLERANCE
}

/// Absolute difference between two timestamps
pub fn mtime_drift(a: SystemTime, b: SystemTime) -> Duration {
    match a.duration_since(b) {
        Ok(d) => d,
        Err(e) => e.duration(),
    }
}
