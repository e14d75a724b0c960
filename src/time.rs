//! Duration and timestamp formatting.
use std::fmt::Display;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Layout used by [`format_time`], e.g. `"2021-12-23 11:45:26"`.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rounds `d` to `digits` decimals (at most 3) of its largest unit.
///
/// Durations above a second are rounded in seconds, above a millisecond in
/// milliseconds and above a microsecond in microseconds. Anything shorter is
/// returned unchanged. Halves round up; a result past [`Duration::MAX`]
/// saturates.
pub fn round(d: Duration, digits: usize) -> Duration {
    let unit: u128 = if d > Duration::from_secs(1) {
        NANOS_PER_SEC
    } else if d > Duration::from_millis(1) {
        1_000_000
    } else if d > Duration::from_micros(1) {
        1_000
    } else {
        return d;
    };
    let step = unit / 10u128.pow(digits.min(3) as u32);
    let rounded = (d.as_nanos() + step / 2) / step * step;
    u64::try_from(rounded / NANOS_PER_SEC).map_or(Duration::MAX, |secs| {
        Duration::new(secs, (rounded % NANOS_PER_SEC) as u32)
    })
}

/// Whole milliseconds of `d` as seconds with `digits` decimals, e.g.
/// `"71.00s"`.
pub fn format_duration(d: Duration, digits: usize) -> String {
    let secs = d.as_millis() as f64 / 1000.0;
    format!("{secs:.digits$}s")
}

/// Formats a timestamp with [`TIME_FORMAT`] in its own time zone.
pub fn format_time<Tz>(t: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    t.format(TIME_FORMAT).to_string()
}

/// Formats a `SystemTime` with [`TIME_FORMAT`] in UTC.
pub fn format_system_time(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    format_time(&datetime)
}

/// Time elapsed since `start`, rounded to two digits.
pub fn took(start: Instant) -> Duration {
    round(start.elapsed(), 2)
}
