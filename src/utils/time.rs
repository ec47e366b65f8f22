use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Forward-looking window starting at `now`
pub fn forward_window(now: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + Duration::days(days))
}

/// Current moment as the model should read it: weekday plus ISO-8601
/// with the local offset, e.g. `Sunday, 2025-08-10T10:00:00-04:00`
pub fn prompt_timestamp(now: DateTime<Utc>, timezone: &Tz) -> String {
    now.with_timezone(timezone)
        .format("%A, %Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}
