//! Recursive synchronizer: depth-first walk driving the copier

use super::copy::{copy_file, set_times};
use super::EventCallback;
use crate::types::{CopyStats, Entry, EntryKind, SmartCopyError};
use std::fs::{self, DirBuilder};
use std::path::Path;

/// Mirror `src` onto `dest`.
///
/// Files go through [`copy_file`]. Directories are created (mirroring
/// permissions), their children synchronized in listing order, and the
/// directory mtime is set last since writing children touches it.
///
/// The first failing child aborts the whole walk.
pub fn synchronize(
    src: &Path,
    dest: &Path,
    stats: &mut CopyStats,
    on_event: Option<&EventCallback<'_>>,
) -> Result<(), SmartCopyError> {
    let entry = Entry::stat(src)?;

    match entry.kind {
        EntryKind::File => copy_file(src, dest, &entry, stats, on_event).map(|_| ()),
        EntryKind::Directory => sync_directory(src, dest, &entry, stats, on_event),
    }
}

fn sync_directory(
    src: &Path,
    dest: &Path,
    entry: &Entry,
    stats: &mut CopyStats,
    on_event: Option<&EventCallback<'_>>,
) -> Result<(), SmartCopyError> {
    tracing::debug!(src = %src.display(), dest = %dest.display(), "entering directory");

    create_dir_mirrored(dest, entry.permissions)
        .map_err(|e| SmartCopyError::access("create directory", dest, e))?;

    let children =
        fs::read_dir(src).map_err(|e| SmartCopyError::access("read directory", src, e))?;

    for child in children {
        let child = child.map_err(|e| SmartCopyError::access("read directory", src, e))?;
        let name = child.file_name();
        synchronize(&src.join(&name), &dest.join(&name), stats, on_event)?;
    }

    set_times(dest, entry)
}

#[cfg(unix)]
fn create_dir_mirrored(path: &Path, permissions: u32) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    DirBuilder::new().recursive(true).mode(permissions).create(path)
}

#[cfg(not(unix))]
fn create_dir_mirrored(path: &Path, _permissions: u32) -> std::io::Result<()> {
    DirBuilder::new().recursive(true).create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SyncEvent;
    use filetime::FileTime;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_synchronize_nested_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(src.join("sub/deeper")).expect("create src dirs");
        fs::create_dir_all(src.join("empty")).expect("create empty dir");
        fs::write(src.join("a.txt"), b"aaaaa").expect("write a");
        fs::write(src.join("sub/deeper/b.txt"), b"bb").expect("write b");

        let mut stats = CopyStats::new();
        synchronize(&src, &dest, &mut stats, None).expect("synchronize");

        assert_eq!(fs::read(dest.join("a.txt")).expect("read a"), b"aaaaa");
        assert_eq!(fs::read(dest.join("sub/deeper/b.txt")).expect("read b"), b"bb");
        assert!(dest.join("empty").is_dir());
        assert_eq!(stats.files_copied, 2);
        assert_eq!(stats.bytes_copied, 7);
    }

    #[test]
    fn test_directory_mtime_is_set_after_children() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(src.join("sub")).expect("create src dirs");
        fs::write(src.join("sub/f.txt"), b"f").expect("write f");

        let dir_mtime = UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        filetime::set_file_mtime(src.join("sub"), FileTime::from_system_time(dir_mtime))
            .expect("set sub mtime");
        filetime::set_file_mtime(&src, FileTime::from_system_time(dir_mtime))
            .expect("set root mtime");

        let mut stats = CopyStats::new();
        synchronize(&src, &dest, &mut stats, None).expect("synchronize");

        for dir in [dest.clone(), dest.join("sub")] {
            let mtime = fs::metadata(&dir).expect("metadata").modified().expect("mtime");
            assert_eq!(mtime, dir_mtime, "{} mtime", dir.display());
        }
    }

    #[test]
    fn test_single_file_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("renamed.txt");
        fs::write(&src, b"hello").expect("write src");

        let mut stats = CopyStats::new();
        synchronize(&src, &dest, &mut stats, None).expect("synchronize");

        assert_eq!(fs::read(&dest).expect("read dest"), b"hello");
        assert_eq!(stats.files_copied, 1);
    }

    #[test]
    fn test_failure_aborts_walk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(src.join("sub")).expect("create src dirs");
        fs::write(src.join("sub/f.txt"), b"f").expect("write f");
        // Destination "sub" is a plain file, so the directory cannot be created
        fs::create_dir_all(&dest).expect("create dest");
        fs::write(dest.join("sub"), b"in the way").expect("write blocker");

        let mut stats = CopyStats::new();
        let err = synchronize(&src, &dest, &mut stats, None).unwrap_err();
        assert!(err.is_io_failure());
        assert_eq!(err.path(), Some(dest.join("sub").as_path()));
    }

    #[test]
    #[cfg(unix)]
    fn test_directory_permissions_are_mirrored() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(src.join("private")).expect("create src dirs");
        fs::set_permissions(src.join("private"), fs::Permissions::from_mode(0o700))
            .expect("set permissions");

        let mut stats = CopyStats::new();
        synchronize(&src, &dest, &mut stats, None).expect("synchronize");

        let mode = fs::metadata(dest.join("private"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn test_callback_may_borrow_local_state() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dest");
        fs::create_dir_all(&src).expect("create src");
        fs::write(src.join("a.txt"), b"a").expect("write a");
        fs::write(src.join("b.txt"), b"b").expect("write b");

        let copied = std::sync::Mutex::new(Vec::new());
        let on_event = |event: &SyncEvent<'_>| {
            if let SyncEvent::FileCopied { path, .. } = event {
                if let Ok(mut names) = copied.lock() {
                    names.push(path.to_path_buf());
                }
            }
        };

        let mut stats = CopyStats::new();
        synchronize(&src, &dest, &mut stats, Some(&on_event)).expect("synchronize");

        let mut names = copied.into_inner().expect("lock not poisoned");
        names.sort();
        assert_eq!(names, vec![src.join("a.txt"), src.join("b.txt")]);
    }
}
