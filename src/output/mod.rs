pub mod formatter;

pub use formatter::{format_json, format_report, humanize_duration, should_use_colors};
