//! Human-readable sizes, speeds and durations (decimal units)

use std::time::Duration;

/// `512B`, `12kB`, `340MB`, `1.5GB`
pub fn format_bytes(bytes: u64) -> String {
    let value = bytes as f64;
    if value >= 1e9 {
        format!("{:.1}GB", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.0}MB", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.0}kB", value / 1e3)
    } else {
        format!("{}B", bytes)
    }
}

/// Same scale as [`format_bytes`], per second
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec >= 1e9 {
        format!("{:.1}GB/s", bytes_per_sec / 1e9)
    } else if bytes_per_sec >= 1e6 {
        format!("{:.0}MB/s", bytes_per_sec / 1e6)
    } else if bytes_per_sec >= 1e3 {
        format!("{:.0}kB/s", bytes_per_sec / 1e3)
    } else {
        format!("{:.0}B/s", bytes_per_sec)
    }
}

/// Round to the nearest millisecond
pub fn round_to_millis(d: Duration) -> Duration {
    let micros = d.as_micros();
    let millis = (micros + 500) / 1000;
    Duration::from_millis(millis as u64)
}

/// Millisecond-rounded duration: `0s`, `15ms`, `1.234s`, `2m3.5s`, `1h0m0s`
pub fn format_duration(d: Duration) -> String {
    let d = round_to_millis(d);
    let total_ms = d.as_millis();

    if total_ms == 0 {
        return "0s".to_string();
    }
    if total_ms < 1000 {
        return format!("{}ms", total_ms);
    }

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = fractional_seconds(total_ms % 60_000);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// `1500` → `1.5`, `2000` → `2`
fn fractional_seconds(ms: u128) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:03}", frac);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
