//! Input validation for the CLI boundary and small display helpers.
use chrono::{NaiveDate, NaiveTime};

use crate::{dates, OrganizerError, Result};

/// Rejects blank titles for records that require one.
pub fn require_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(OrganizerError::InvalidInput {
            message: "title cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Parses a `YYYY-MM-DD` argument.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    dates::parse_day(input).ok_or_else(|| OrganizerError::InvalidInput {
        message: format!("invalid date '{}', expected YYYY-MM-DD", input),
    })
}

/// Parses a `YYYY-MM` argument into the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate> {
    dates::parse_month(input).ok_or_else(|| OrganizerError::InvalidInput {
        message: format!("invalid month '{}', expected YYYY-MM", input),
    })
}

/// Validates a time of day and normalizes it to zero-padded `HH:MM`.
pub fn parse_time(input: &str) -> Result<String> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| OrganizerError::InvalidInput {
            message: format!("invalid time '{}', expected HH:MM", input),
        })
}

/// First non-empty line of `content`, cut to `max_chars` characters.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
