//! Due-date arithmetic and status classification.
//!
//! Everything here is pure: "today" is always passed in.

use crate::domain::models::{NextDue, Status, TrackingType};
use chrono::{Months, NaiveDate};

/// Requirements due within this many days are `ORANGE`.
pub const DUE_SOON_DAYS: i64 = 90;

/// Parses `YYYY-MM-DD`, also accepting a full ISO timestamp by its date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    match (s.get(..10), s.get(10..11)) {
        (Some(day), Some("T")) => NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// Calendar-month addition. A day that does not exist in the target month is
/// clamped to that month's last day (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

pub fn next_due(tracking: TrackingType, last_date: &str, periodicity_months: u32) -> NextDue {
    match tracking {
        TrackingType::Continuous => NextDue::Continuous,
        TrackingType::Periodic => match parse_date(last_date) {
            Some(d) => NextDue::Date(add_months(d, periodicity_months)),
            None => NextDue::Invalid,
        },
    }
}

/// Whole calendar days from `today` to `due`; negative when overdue.
pub fn days_until(today: NaiveDate, due: NaiveDate) -> i64 {
    (due - today).num_days()
}

pub fn classify(next_due: NextDue, today: NaiveDate, due_soon_days: i64) -> Status {
    match next_due {
        NextDue::Continuous => Status::Green,
        // fail closed
        NextDue::Invalid => Status::Red,
        NextDue::Date(due) => {
            let diff = days_until(today, due);
            if diff < 0 {
                Status::Red
            } else if diff <= due_soon_days {
                Status::Orange
            } else {
                Status::Green
            }
        }
    }
}

pub fn compute_status(
    tracking: TrackingType,
    last_date: &str,
    periodicity_months: u32,
    today: NaiveDate,
) -> Status {
    classify(
        next_due(tracking, last_date, periodicity_months),
        today,
        DUE_SOON_DAYS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> NaiveDate {
        parse_date(raw).expect("valid test date")
    }

    #[test]
    fn overdue_annual_check_is_red() {
        let due = next_due(TrackingType::Periodic, "2023-05-15", 12);
        assert_eq!(due, NextDue::Date(d("2024-05-15")));
        assert_eq!(days_until(d("2024-06-01"), d("2024-05-15")), -17);
        assert_eq!(
            compute_status(TrackingType::Periodic, "2023-05-15", 12, d("2024-06-01")),
            Status::Red
        );
    }

    #[test]
    fn monthly_check_due_in_two_weeks_is_orange() {
        assert_eq!(
            next_due(TrackingType::Periodic, "2024-02-01", 1),
            NextDue::Date(d("2024-03-01"))
        );
        assert_eq!(
            compute_status(TrackingType::Periodic, "2024-02-01", 1, d("2024-02-15")),
            Status::Orange
        );
    }

    #[test]
    fn continuous_is_always_green() {
        for last in ["2000-01-01", "2999-12-31", "not a date", ""] {
            assert_eq!(
                compute_status(TrackingType::Continuous, last, 0, d("2024-06-01")),
                Status::Green
            );
        }
        assert_eq!(
            next_due(TrackingType::Continuous, "2024-01-01", 0),
            NextDue::Continuous
        );
    }

    #[test]
    fn window_boundaries() {
        let today = d("2024-01-01");
        let at = |offset: i64| {
            classify(NextDue::Date(today + chrono::Duration::days(offset)), today, 90)
        };
        assert_eq!(at(-1), Status::Red);
        assert_eq!(at(0), Status::Orange);
        assert_eq!(at(90), Status::Orange);
        assert_eq!(at(91), Status::Green);
    }

    #[test]
    fn zero_months_is_identity() {
        let date = d("2024-07-19");
        assert_eq!(add_months(date, 0), date);
    }

    #[test]
    fn month_overflow_clamps_to_last_day() {
        assert_eq!(add_months(d("2024-01-31"), 1), d("2024-02-29"));
        assert_eq!(add_months(d("2023-01-31"), 1), d("2023-02-28"));
        assert_eq!(add_months(d("2024-08-31"), 13), d("2025-09-30"));
    }

    #[test]
    fn malformed_date_fails_closed() {
        assert_eq!(
            next_due(TrackingType::Periodic, "15/05/2023", 12),
            NextDue::Invalid
        );
        assert_eq!(
            compute_status(TrackingType::Periodic, "garbage", 12, d("2024-06-01")),
            Status::Red
        );
    }

    #[test]
    fn timestamps_use_their_date_part() {
        assert_eq!(parse_date("2024-02-01T00:00:00.000Z"), Some(d("2024-02-01")));
        assert_eq!(parse_date(" 2024-02-01 "), Some(d("2024-02-01")));
        assert_eq!(parse_date("2024-02-01X"), None);
    }
}
