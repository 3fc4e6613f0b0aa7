//! CopyStats - Counters accumulated over one run

use std::time::{Duration, Instant};

/// Smallest elapsed time used when computing throughput
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

/// Statistics for a whole run.
///
/// Owned by the top-level run and passed by `&mut` through the traversal.
/// Only the copier and the reconciler write to it.
#[derive(Debug, Clone)]
pub struct CopyStats {
    pub files_copied: u64,
    pub files_skipped: u64,
    pub bytes_copied: u64,
    pub extra_found: u64,
    pub extra_deleted: u64,
    /// Size of extra files (extra directories are counted, not measured)
    pub extra_bytes: u64,
    pub started_at: Instant,
}

impl CopyStats {
    pub fn new() -> Self {
        Self {
            files_copied: 0,
            files_skipped: 0,
            bytes_copied: 0,
            extra_found: 0,
            extra_deleted: 0,
            extra_bytes: 0,
            started_at: Instant::now(),
        }
    }

    pub fn record_copy(&mut self, bytes: u64) {
        self.files_copied += 1;
        self.bytes_copied += bytes;
    }

    pub fn record_skip(&mut self) {
        self.files_skipped += 1;
    }

    pub fn record_extra_file(&mut self, size: u64) {
        self.extra_found += 1;
        self.extra_bytes += size;
    }

    pub fn record_extra_dir(&mut self) {
        self.extra_found += 1;
    }

    pub fn record_deleted(&mut self) {
        self.extra_deleted += 1;
    }

    /// Wall-clock time since the run started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Overall throughput in bytes per second for the given elapsed time
    pub fn speed(&self, elapsed: Duration) -> f64 {
        bytes_per_second(self.bytes_copied, elapsed)
    }
}

impl Default for CopyStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Throughput with elapsed time floored at [`MIN_ELAPSED`]
pub fn bytes_per_second(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.max(MIN_ELAPSED).as_secs_f64();
    bytes as f64 / secs
}
