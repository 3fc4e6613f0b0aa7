//! Single-file copy with freshness check and timestamp preservation

use super::timestamp::sanitize_mtime;
use super::{emit_event, EventCallback, SyncEvent};
use crate::diff::needs_update;
use crate::types::{CopyStats, Entry, SmartCopyError};
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy one file if the destination is stale.
///
/// 1. Skip when [`needs_update`] says the destination is current
/// 2. Create the parent directory chain
/// 3. Stream bytes into a truncated destination opened with the source mode
/// 4. Flush and close before touching timestamps
/// 5. Set atime/mtime to the sanitized source mtime
///
/// # Returns
/// * `Ok(u64)` - Bytes written (0 when skipped)
/// * `Err(SmartCopyError)` - Access, transfer or metadata failure. A transfer
///   failure leaves a truncated destination behind.
///
/// Updates `stats` exactly once: either a copy or a skip.
pub fn copy_file(
    src: &Path,
    dest: &Path,
    entry: &Entry,
    stats: &mut CopyStats,
    on_event: Option<&EventCallback<'_>>,
) -> Result<u64, SmartCopyError> {
    // ═══════════════════════════════════════════════════════════
    // STEP 1: Freshness - skip up-to-date destinations
    // ═══════════════════════════════════════════════════════════
    if !needs_update(entry, dest)? {
        tracing::debug!(src = %src.display(), "up to date");
        stats.record_skip();
        emit_event(on_event, SyncEvent::FileSkipped { path: src });
        return Ok(0);
    }

    // ═══════════════════════════════════════════════════════════
    // STEP 2: Prepare - parent directories, open both ends
    // ═══════════════════════════════════════════════════════════
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| SmartCopyError::access("create destination directory", parent, e))?;
        }
    }

    let mut src_file = File::open(src)
        .map_err(|e| SmartCopyError::access("open source file", src, e))?;
    let mut dest_file = open_destination(dest, entry.permissions)
        .map_err(|e| SmartCopyError::access("create destination file", dest, e))?;

    // ═══════════════════════════════════════════════════════════
    // STEP 3: Copy - stream source into destination
    // ═══════════════════════════════════════════════════════════
    let started = Instant::now();
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| SmartCopyError::transfer(src, dest, e))?;
        if bytes_read == 0 {
            break;
        }
        dest_file
            .write_all(&buffer[..bytes_read])
            .map_err(|e| SmartCopyError::transfer(src, dest, e))?;
        total_bytes += bytes_read as u64;
    }
    let elapsed = started.elapsed();

    // ═══════════════════════════════════════════════════════════
    // STEP 4: Flush - some platforms reset mtime on close, so close first
    // ═══════════════════════════════════════════════════════════
    dest_file
        .sync_all()
        .map_err(|e| SmartCopyError::transfer(src, dest, e))?;
    drop(dest_file);
    drop(src_file);

    // ═══════════════════════════════════════════════════════════
    // STEP 5: Metadata - sanitized source mtime
    // ═══════════════════════════════════════════════════════════
    set_times(dest, entry)?;

    tracing::debug!(src = %src.display(), dest = %dest.display(), bytes = total_bytes, "copied");
    stats.record_copy(total_bytes);
    emit_event(
        on_event,
        SyncEvent::FileCopied {
            path: src,
            bytes: total_bytes,
            elapsed,
        },
    );

    Ok(total_bytes)
}

/// Set access and modification time of `path` to the sanitized mtime of `entry`.
pub fn set_times(path: &Path, entry: &Entry) -> Result<(), SmartCopyError> {
    let mtime = FileTime::from_system_time(sanitize_mtime(entry.mtime));
    filetime::set_file_times(path, mtime, mtime).map_err(|e| SmartCopyError::metadata(path, e))
}

#[cfg(unix)]
fn open_destination(dest: &Path, permissions: u32) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(permissions)
        .open(dest)
}

#[cfg(not(unix))]
fn open_destination(dest: &Path, _permissions: u32) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
}
