//! Progress lines and run summary

use super::format::{format_bytes, format_duration, format_speed, round_to_millis};
use crate::config::{OutputMode, SyncOptions};
use crate::executor::SyncEvent;
use crate::types::{bytes_per_second, CopyStats};
use console::style;
use serde::Serialize;
use std::time::Duration;

/// Prints engine events and the final summary to stdout
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    output: OutputMode,
}

impl Reporter {
    pub fn new(output: OutputMode) -> Self {
        Self { output }
    }

    /// Handle one engine event. Silent in JSON mode.
    pub fn on_event(&self, event: &SyncEvent<'_>) {
        if self.output == OutputMode::Json {
            return;
        }
        for line in event_lines(event) {
            println!("{}", line);
        }
    }

    /// Print the end-of-run report
    pub fn finish(&self, stats: &CopyStats, options: &SyncOptions) {
        let elapsed = stats.elapsed();
        match self.output {
            OutputMode::Text => {
                println!();
                println!("{}", render_summary(stats, options, elapsed));
            }
            OutputMode::Json => {
                let report = SummaryReport::new(stats, options, elapsed);
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!(error = %e, "failed to serialize summary"),
                }
            }
        }
    }
}

/// Text lines for one event
pub fn event_lines(event: &SyncEvent<'_>) -> Vec<String> {
    match event {
        SyncEvent::FileSkipped { path } => {
            vec![format!("{} (skipped - up to date)", path.display())]
        }
        SyncEvent::FileCopied {
            path,
            bytes,
            elapsed,
        } => vec![format!(
            "{} ({} bytes, {})",
            path.display(),
            bytes,
            format_speed(bytes_per_second(*bytes, *elapsed))
        )],
        SyncEvent::ExtrasFound { extras } => {
            let mut lines = Vec::with_capacity(extras.len() + 2);
            lines.push(String::new());
            lines.push("Extra files/directories found in destination:".to_string());
            for file in &extras.files {
                lines.push(format!("  FILE: {}", file.path.display()));
            }
            for dir in &extras.dirs {
                lines.push(format!("  DIR:  {}", dir.display()));
            }
            lines
        }
        SyncEvent::DeletionStarted => {
            vec![String::new(), "Deleting extra files/directories...".to_string()]
        }
        SyncEvent::ExtraDeleted { path } => {
            vec![format!("  {} {}", style("DELETED:").green(), path.display())]
        }
        SyncEvent::DeleteFailed { path, kind, error } => vec![format!(
            "  {} Failed to delete {} '{}': {}",
            style("WARNING:").yellow(),
            kind.label(),
            path.display(),
            error
        )],
    }
}

/// `Summary: <N> files copied, <N> files skipped, <size> copied in <duration> (<speed>)[, ...]`
pub fn render_summary(stats: &CopyStats, options: &SyncOptions, elapsed: Duration) -> String {
    let mut line = format!(
        "Summary: {} files copied, {} files skipped, {} copied in {} ({})",
        stats.files_copied,
        stats.files_skipped,
        format_bytes(stats.bytes_copied),
        format_duration(elapsed),
        format_speed(stats.speed(elapsed))
    );

    if options.detect_extra {
        if options.delete_extra {
            line.push_str(&format!(", {} extra items deleted", stats.extra_deleted));
        } else {
            line.push_str(&format!(", {} extra items found", stats.extra_found));
        }
        if stats.extra_bytes > 0 {
            line.push_str(&format!(" ({})", format_bytes(stats.extra_bytes)));
        }
    }

    line
}

/// Machine-readable final statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub files_copied: u64,
    pub files_skipped: u64,
    pub bytes_copied: u64,
    pub elapsed_ms: u64,
    pub bytes_per_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_found: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_deleted: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_bytes: Option<u64>,
}

impl SummaryReport {
    pub fn new(stats: &CopyStats, options: &SyncOptions, elapsed: Duration) -> Self {
        let detect = options.detect_extra;
        Self {
            files_copied: stats.files_copied,
            files_skipped: stats.files_skipped,
            bytes_copied: stats.bytes_copied,
            elapsed_ms: round_to_millis(elapsed).as_millis() as u64,
            bytes_per_sec: stats.speed(elapsed),
            extra_found: detect.then_some(stats.extra_found),
            extra_deleted: options.delete_extra.then_some(stats.extra_deleted),
            extra_bytes: detect.then_some(stats.extra_bytes),
        }
    }
}
