//! Clock and duration strings as they appear in the telemetry exports
//!
//! Parsing is lenient: every malformed component degrades to zero instead of
//! failing, so a bad cell never takes a report down.

use chrono::{Datelike, NaiveDateTime, Timelike};

/// Minutes in one nominal day
pub const MINUTES_PER_DAY: f64 = 1440.0;

fn component(part: Option<&str>) -> f64 {
    part.and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// "HH:MM:SS" to minutes of day (`H*60 + M + S/60`).
///
/// Hours past 23 are kept so intervals that cross midnight stay ordered.
pub fn parse_clock_minutes(s: &str) -> f64 {
    if s.trim().is_empty() {
        return 0.0;
    }

    let mut parts = s.split(':');
    let h = component(parts.next());
    let m = component(parts.next());
    let sec = component(parts.next());
    h * 60.0 + m + sec / 60.0
}

/// Duration string to seconds.
///
/// Accepts "HH:MM:SS", "MM:SS" or a decimal number of hours.
pub fn parse_duration_seconds(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let parts: Vec<&str> = s.split(':').collect();
    let parsed: Option<Vec<f64>> = parts
        .iter()
        .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    match parsed.as_deref() {
        Some([h, m, sec]) => h * 3600.0 + m * 60.0 + sec,
        Some([m, sec]) => m * 60.0 + sec,
        Some([hours]) => hours * 3600.0,
        _ => 0.0,
    }
}

/// Spreadsheet-style duration ("1899-12-31T02:15:00") to whole minutes.
///
/// Spreadsheets store durations as timestamps after their epoch, so the day
/// of month counts whole days.
pub fn parse_spreadsheet_minutes(s: &str) -> f64 {
    match NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => {
            let days = dt.day() as f64;
            let seconds = dt.second() as f64;
            days * MINUTES_PER_DAY
                + dt.hour() as f64 * 60.0
                + dt.minute() as f64
                + (seconds / 60.0).round()
        }
        Err(_) => 0.0,
    }
}

/// Minutes of day to "HH:MM", wrapping hours at 24
pub fn format_clock(minutes: f64) -> String {
    let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
    let mut h = (minutes / 60.0).floor() as u64;
    let m = (minutes % 60.0).floor() as u64;
    if h >= 24 {
        h -= 24;
    }
    format!("{:02}:{:02}", h, m)
}

/// Hour tick label, wrapping values of 24 and above
pub fn wrap_hour(hour: u32) -> u32 {
    if hour >= 24 {
        hour - 24
    } else {
        hour
    }
}

/// Seconds to "MM:SS"
pub fn format_mm_ss(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).round() as u64 } else { 0 };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Seconds to "HH:MM:SS"
pub fn format_hh_mm_ss(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).round() as u64 } else { 0 };
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Decimal hours to "HH:MM"
pub fn format_hh_mm(hours: f64) -> String {
    if !hours.is_finite() || hours < 0.0 {
        return "00:00".to_string();
    }
    let mut h = hours.floor() as u64;
    let mut m = ((hours - hours.floor()) * 60.0).round() as u64;
    if m == 60 {
        h += 1;
        m = 0;
    }
    format!("{:02}:{:02}", h, m)
}

/// Decimal hours to "1h05m"
pub fn format_hours_minutes(hours: f64) -> String {
    if !hours.is_finite() || hours < 0.0 {
        return "0h00m".to_string();
    }
    let mut h = hours.floor() as u64;
    let mut m = ((hours - hours.floor()) * 60.0).round() as u64;
    if m == 60 {
        h += 1;
        m = 0;
    }
    format!("{}h{:02}m", h, m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock_minutes("08:00:00"), 480.0);
        assert_eq!(parse_clock_minutes("13:01:30"), 781.5);
        assert_eq!(parse_clock_minutes("25:00:00"), 1500.0);
    }

    #[test]
    fn test_parse_clock_malformed() {
        assert_eq!(parse_clock_minutes(""), 0.0);
        assert_eq!(parse_clock_minutes("abc"), 0.0);
        assert_eq!(parse_clock_minutes("10:xx:30"), 600.5);
        assert_eq!(parse_clock_minutes("07"), 420.0);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_seconds("00:01:05"), 65.0);
        assert_eq!(parse_duration_seconds("02:30"), 150.0);
        assert_eq!(parse_duration_seconds("1.5"), 5400.0);
        assert_eq!(parse_duration_seconds("1:xx:00"), 0.0);
        assert_eq!(parse_duration_seconds("1:2:3:4"), 0.0);
        assert_eq!(parse_duration_seconds(""), 0.0);
    }

    #[test]
    fn test_parse_spreadsheet() {
        assert_eq!(parse_spreadsheet_minutes("1899-12-31T02:15:00"), 31.0 * 1440.0 + 135.0);
        assert_eq!(parse_spreadsheet_minutes("1900-01-01T00:10:40"), 1440.0 + 11.0);
        assert_eq!(parse_spreadsheet_minutes("02:15:00"), 0.0);
    }

    #[test]
    fn test_format_clock_wraps() {
        assert_eq!(format_clock(480.0), "08:00");
        assert_eq!(format_clock(1500.0), "01:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_mm_ss(65.0), "01:05");
        assert_eq!(format_hh_mm_ss(3725.0), "01:02:05");
        assert_eq!(format_hh_mm(7.8333), "07:50");
        assert_eq!(format_hours_minutes(0.5), "0h30m");
        assert_eq!(format_hours_minutes(1.999), "2h00m");
        assert_eq!(wrap_hour(24), 0);
        assert_eq!(wrap_hour(23), 23);
    }
}
