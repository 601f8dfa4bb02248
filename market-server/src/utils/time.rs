//! Relative time formatting
//!
//! Human-facing "N mins ago" strings for order listings and detail views.
//! Thresholds and wording are part of the client contract, storefront apps
//! display these strings verbatim.

/// Format the elapsed time between two Unix-millisecond timestamps.
///
/// Buckets: under a minute is "Just now", then minutes, hours and days.
/// Units are singular exactly at 1. A `then_millis` in the future (clock
/// skew between nodes) clamps to "Just now".
pub fn time_ago(then_millis: i64, now_millis: i64) -> String {
    let elapsed_secs = (now_millis - then_millis).max(0) / 1000;

    if elapsed_secs < 60 {
        return "Just now".to_string();
    }

    let minutes = elapsed_secs / 60;
    if minutes < 60 {
        return format!("{} {} ago", minutes, if minutes == 1 { "min" } else { "mins" });
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} {} ago", hours, if hours == 1 { "hour" } else { "hours" });
    }

    let days = hours / 24;
    format!("{} {} ago", days, if days == 1 { "day" } else { "days" })
}
