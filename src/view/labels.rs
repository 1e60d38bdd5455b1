//! Axis and caption formatting.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// `"Dec 6"`
pub fn month_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// `"6 Dec"`
pub fn day_month(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Zero-padded hour of a timestamp: `"07:00"`.
pub fn padded_hour(ts: NaiveDateTime) -> String {
    ts.format("%H:00").to_string()
}

/// `count` consecutive days starting at `start`, cut short at chrono's last date.
pub fn consecutive_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map_while(|i| start.checked_add_signed(Duration::days(i as i64)))
        .collect()
}

/// Caption for the week navigator.
pub fn week_caption(week_offset: u32) -> String {
    match week_offset {
        0 => "Current Week".to_string(),
        1 => "1 Week Ago".to_string(),
        n => format!("{n} Weeks Ago"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_day() {
        assert_eq!(month_day(day(2023, 12, 6)), "Dec 6");
        assert_eq!(month_day(day(2024, 1, 12)), "Jan 12");
    }

    #[test]
    fn test_day_month() {
        assert_eq!(day_month(day(2007, 12, 5)), "5 Dec");
        assert_eq!(day_month(day(2007, 11, 29)), "29 Nov");
    }

    #[test]
    fn test_padded_hour() {
        let ts = day(2007, 12, 1).and_hms_opt(7, 30, 0).unwrap();
        assert_eq!(padded_hour(ts), "07:00");
    }

    #[test]
    fn test_consecutive_days_cross_month() {
        let days = consecutive_days(day(2023, 12, 29), 4);
        let labels: Vec<String> = days.into_iter().map(month_day).collect();
        assert_eq!(labels, vec!["Dec 29", "Dec 30", "Dec 31", "Jan 1"]);
    }

    #[test]
    fn test_consecutive_days_stop_at_last_date() {
        let days = consecutive_days(NaiveDate::MAX - Duration::days(1), 7);
        assert_eq!(days, vec![NaiveDate::MAX - Duration::days(1), NaiveDate::MAX]);
    }

    #[rstest]
    #[case(0, "Current Week")]
    #[case(1, "1 Week Ago")]
    #[case(3, "3 Weeks Ago")]
    fn test_week_caption(#[case] offset: u32, #[case] expected: &str) {
        assert_eq!(week_caption(offset), expected);
    }
}
