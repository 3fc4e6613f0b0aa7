//! Terminal output

mod format;
mod report;

pub use format::{format_bytes, format_duration, format_speed};
pub use report::{event_lines, render_summary, Reporter, SummaryReport};
