use chrono::NaiveDateTime;

/// Timestamp format of the `time` column in measurement logs.
pub const LOG_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Format shown in the start/end entries.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Short format used next to extrema and on the time axis.
pub const MARKER_FORMAT: &str = "%d/%m %H:%M:%S";

/// Formats accepted when the user types a time into an entry, tried in order.
pub const ENTRY_FORMATS: &[&str] = &[
    DISPLAY_FORMAT,
    LOG_TIME_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Parse a `time` cell (`DD/MM/YYYY HH:MM:SS`).
pub fn parse_log_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), LOG_TIME_FORMAT).ok()
}

/// Parse a user-typed time, accepting any of [`ENTRY_FORMATS`] or a bare date
/// (midnight).
pub fn parse_entry_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for fmt in ENTRY_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

pub fn format_display(ts: NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

pub fn format_marker(ts: NaiveDateTime) -> String {
    ts.format(MARKER_FORMAT).to_string()
}

/// Signed seconds from `from` to `to`, millisecond precision.
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// `Time Elapsed: 3725s`
pub fn elapsed_seconds_label(seconds: i64) -> String {
    format!("Time Elapsed: {seconds}s")
}

/// `Time Elapsed: 0d 1h 2m 5s`
pub fn elapsed_dhms_label(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (days, rem) = (seconds / 86_400, seconds % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, secs) = (rem / 60, rem % 60);
    format!("Time Elapsed: {days}d {hours}h {minutes}m {secs}s")
}

/// Integer with `,` thousands separators.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Points: 12,345`
pub fn points_label(n: usize) -> String {
    format!("Points: {}", format_count(n))
}
