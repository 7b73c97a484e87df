//! Due-date input parsing and display helpers.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "mon".."sun", "monday".."sunday", "this friday", "next monday"
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let weekday = today.weekday().num_days_from_monday() as i64;
            return Some(today + Duration::days(6 - weekday));
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        // Out-of-range counts are unparseable, not a panic.
        if let Some(nd) = rest.strip_suffix('d') {
            let days = nd.trim().parse::<i64>().ok()?;
            return Duration::try_days(days).and_then(|d| today.checked_add_signed(d));
        }
        if let Some(nw) = rest.strip_suffix('w') {
            let weeks = nw.trim().parse::<i64>().ok()?;
            return Duration::try_weeks(weeks).and_then(|d| today.checked_add_signed(d));
        }
    }

    let (day_name, skip_week) = if let Some(rest) = s.strip_prefix("next ") {
        (rest, true)
    } else if let Some(rest) = s.strip_prefix("this ") {
        (rest, false)
    } else {
        (s.as_str(), false)
    };
    if let Some(target) = weekday_index(day_name) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let days = match (skip_week, ahead) {
            (true, 0) => 7,
            (true, n) => n + 7,
            (false, n) => n,
        };
        return Some(today + Duration::days(days));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    let idx = match name {
        "monday" | "mon" => 0,
        "tuesday" | "tue" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(idx)
}

/// Field input to a due date: blank means "no due date", anything else must parse.
pub fn parse_due_field(s: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    parse_due_input(s, today)
        .map(Some)
        .ok_or_else(|| format!("Unrecognised due date '{}'", s.trim()))
}

/// The instant a due date stands for: midnight UTC at the start of that day.
pub fn due_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {}d", days)
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

/// Format a due date for a field value; blank when unset.
pub fn format_due_field(due: Option<NaiveDate>) -> String {
    due.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    // 2024-05-01 is a Wednesday.
    fn wed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_relative_keywords() {
        assert_eq!(parse_due_input("today", wed()), Some(wed()));
        assert_eq!(parse_due_input(" Tomorrow ", wed()), Some(ymd(2024, 5, 2)));
        assert_eq!(parse_due_input("yesterday", wed()), Some(ymd(2024, 4, 30)));
        assert_eq!(parse_due_input("in 3d", wed()), Some(ymd(2024, 5, 4)));
        assert_eq!(parse_due_input("in 2w", wed()), Some(ymd(2024, 5, 15)));
        assert_eq!(parse_due_input("eow", wed()), Some(ymd(2024, 5, 5)));
        assert_eq!(parse_due_input("end of month", wed()), Some(ymd(2024, 5, 31)));
        assert_eq!(parse_due_input("eom", ymd(2024, 12, 10)), Some(ymd(2024, 12, 31)));
    }

    #[test]
    fn test_weekdays() {
        assert_eq!(parse_due_input("fri", wed()), Some(ymd(2024, 5, 3)));
        assert_eq!(parse_due_input("wednesday", wed()), Some(wed()));
        assert_eq!(parse_due_input("this monday", wed()), Some(ymd(2024, 5, 6)));
        assert_eq!(parse_due_input("next friday", wed()), Some(ymd(2024, 5, 10)));
        assert_eq!(parse_due_input("next wed", wed()), Some(ymd(2024, 5, 8)));
    }

    #[test]
    fn test_iso_and_garbage() {
        assert_eq!(parse_due_input("2024-12-25", wed()), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_due_input("someday", wed()), None);
        assert_eq!(parse_due_input("2024-13-01", wed()), None);
    }

    #[test]
    fn test_huge_offsets_are_rejected() {
        assert_eq!(parse_due_input("in 99999999999d", wed()), None);
        assert_eq!(parse_due_input("in 9223372036854775807d", wed()), None);
        assert_eq!(parse_due_input("in 99999999999w", wed()), None);
        assert_eq!(parse_due_input("in -99999999999d", wed()), None);
        assert!(parse_due_field("in 99999999999d", wed())
            .unwrap_err()
            .contains("Unrecognised due date"));
    }

    #[test]
    fn test_due_field() {
        assert_eq!(parse_due_field("  ", wed()), Ok(None));
        assert_eq!(parse_due_field("today", wed()), Ok(Some(wed())));
        assert!(parse_due_field("soon", wed()).is_err());
    }

    #[test]
    fn test_due_instant_is_utc_midnight() {
        let at = due_instant(wed());
        assert_eq!(at.date_naive(), wed());
        assert_eq!(at.hour(), 0);
        assert_eq!(at.minute(), 0);
    }

    #[test]
    fn test_format_due_relative() {
        assert_eq!(format_due_relative(None, wed()), "-");
        assert_eq!(format_due_relative(Some(wed()), wed()), "today");
        assert_eq!(format_due_relative(Some(ymd(2024, 5, 2)), wed()), "tomorrow");
        assert_eq!(format_due_relative(Some(ymd(2024, 5, 4)), wed()), "in 3d");
        assert_eq!(format_due_relative(Some(ymd(2024, 4, 29)), wed()), "2d late");
    }
}
