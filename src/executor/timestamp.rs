//! Timestamp sanitizing for FAT-family destinations

use chrono::{Local, NaiveDate, TimeZone};
use std::time::SystemTime;

/// Earliest timestamp representable on FAT/exFAT (local time)
pub fn fat_floor() -> Option<SystemTime> {
    local_time(1980, 1, 1, 0, 0, 0)
}

/// Latest timestamp representable on FAT/exFAT (local time)
pub fn fat_ceiling() -> Option<SystemTime> {
    local_time(2107, 12, 31, 23, 59, 58)
}

fn local_time(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, min, sec)?;
    // A wall-clock time skipped by a DST transition falls back to reading it as UTC.
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive));
    Some(local.into())
}

/// Clamp `mtime` into `[1980-01-01T00:00:00, 2107-12-31T23:59:58]` local time.
pub fn sanitize_mtime(mtime: SystemTime) -> SystemTime {
    if let Some(floor) = fat_floor() {
        if mtime < floor {
            return floor;
        }
    }
    if let Some(ceiling) = fat_ceiling() {
        if mtime > ceiling {
            return ceiling;
        }
    }
    mtime
}
