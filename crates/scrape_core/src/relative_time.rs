/// Milliseconds since the Unix epoch. Non-finite values are invalid instants.
pub type EpochMillis = f64;

const MINUTE_MS: f64 = 60_000.0;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

pub const NO_HISTORY: &str = "No refresh history found.";
pub const INVALID_DATE: &str = "Invalid date";
pub const JUST_NOW: &str = "just now";

/// Formats the age of `timestamp` relative to `now` as a coarse bucket.
///
/// Elapsed time is truncated to whole minutes, hours or days. Absent, invalid
/// and future timestamps produce fixed strings that never take the `" ago"` suffix.
pub fn relative_time(timestamp: Option<EpochMillis>, now: EpochMillis, add_suffix: bool) -> String {
    let Some(timestamp) = timestamp else {
        return NO_HISTORY.to_string();
    };
    if !timestamp.is_finite() || !now.is_finite() {
        return INVALID_DATE.to_string();
    }

    let elapsed = now - timestamp;
    if elapsed < 0.0 {
        return JUST_NOW.to_string();
    }

    let bucket = if elapsed < MINUTE_MS {
        "less than a minute".to_string()
    } else if elapsed < HOUR_MS {
        plural((elapsed / MINUTE_MS).floor(), "minute")
    } else if elapsed < DAY_MS {
        plural((elapsed / HOUR_MS).floor(), "hour")
    } else {
        plural((elapsed / DAY_MS).floor(), "day")
    };

    if add_suffix {
        format!("{bucket} ago")
    } else {
        bucket
    }
}

fn plural(count: f64, unit: &str) -> String {
    let count = count as u64;
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
