//! # Web Server Utilities
//!
//! Helpers for formatting times in the dashboard.

use chrono::{DateTime, Utc};
use chrono_humanize::{Accuracy, HumanTime, Tense};

/// Describes how long ago `then` was, e.g. "7 minutes ago".
pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    HumanTime::from(now - then).to_text_en(Accuracy::Rough, Tense::Past)
}

/// Renders unix seconds as `MM-DD HH:MM:SS` followed by the relative time.
///
/// Timestamps that do not fit a `DateTime` are returned as the plain number.
pub fn render_timestamp(secs: i64, now: DateTime<Utc>) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(t) => format!("{} ({})", t.format("%m-%d %H:%M:%S"), humanize_since(t, now)),
        None => secs.to_string(),
    }
}
