//! Shared utility functions with zero-cost abstractions.

use chrono::{Duration, NaiveDate};

/// Formats a calendar day as a `MM/DD` axis label.
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%m/%d").to_string()
}

/// Labels for the `day_count` calendar days ending the day before `today`,
/// oldest first.
pub fn trailing_day_labels(today: NaiveDate, day_count: usize) -> Vec<String> {
    (1..=day_count)
        .rev()
        .map(|back| format_day_label(today - Duration::days(back as i64)))
        .collect()
}

/// Formats a legend entry pairing a name with its value.
pub fn format_legend_entry(name: &str, value: u64) -> String {
    format!("{name} ({value})")
}
