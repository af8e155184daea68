//! Human-readable timestamp formatting.
//!
//! Timestamps arrive as RFC 3339 strings, or the literal sentinel
//! `"unknown"` for files whose mtime could not be read.

use chrono::{DateTime, Local, Utc};

/// Format a timestamp relative to now, e.g. `"3 hours ago"`.
///
/// The `"unknown"` sentinel passes through unchanged; so does anything that
/// fails to parse as RFC 3339. Distances under a minute format as `"now"`,
/// future timestamps as `"in N <unit>s"`.
pub fn format_relative_time(iso: &str) -> String {
    if iso == "unknown" {
        return "unknown".to_string();
    }
    let Ok(then) = DateTime::parse_from_rfc3339(iso) else {
        return "unknown".to_string();
    };
    relative_to_now(Utc::now().signed_duration_since(then).num_seconds())
}

/// Format a signed second distance (positive = past).
///
/// Floor-divided buckets with fixed thresholds: 60 s, 60 min, 24 h, 7 d,
/// 4 w (days/7), 12 mo (days/30), then years (days/365).
fn relative_to_now(delta_secs: i64) -> String {
    let secs = delta_secs.unsigned_abs() as i64;
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    let (amount, unit) = if secs < 60 {
        return "now".to_string();
    } else if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 7 {
        (days, "day")
    } else if weeks < 4 {
        (weeks, "week")
    } else if months < 12 {
        (months, "month")
    } else {
        (years, "year")
    };

    let plural = if amount == 1 { "" } else { "s" };
    if delta_secs < 0 {
        format!("in {} {}{}", amount, unit, plural)
    } else {
        format!("{} {}{} ago", amount, unit, plural)
    }
}

/// Format a timestamp in local time as `YYYY-MM-DD HH:MM:SS`.
///
/// The `"unknown"` sentinel (and unparseable input) maps to `"Unknown"`.
pub fn format_local_time(iso: &str) -> String {
    if iso == "unknown" {
        return "Unknown".to_string();
    }
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => "Unknown".to_string(),
    }
}
