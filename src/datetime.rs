//! Due-date formatting and remaining-time arithmetic.
//!
//! Absolute due dates are rendered in local time; remaining time is computed
//! against a caller-supplied "now" so renders stay honest about the current
//! moment and tests can freeze it.

use chrono::{DateTime, Local, Utc};

/// Rendered in place of a remaining-time span once the due date has passed.
pub const OVERDUE: &str = "期日超過";

/// Format a due timestamp as an absolute local date/time.
pub fn format_limit_local(limit: DateTime<Utc>) -> String {
    limit
        .with_timezone(&Local)
        .format("%Y年%m月%d日%H時%M分")
        .to_string()
}

/// Format the time remaining until `limit`, measured from `now`.
///
/// A positive difference renders as `D日H時間M分` with whole-minute
/// resolution; anything else is overdue. Sub-minute remainders render as
/// `0日0時間0分` rather than overdue, matching a strict "past the limit"
/// reading.
pub fn format_remaining(limit: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = limit - now;
    if delta > chrono::Duration::zero() {
        let total_minutes = delta.num_minutes();
        let days = total_minutes / 60 / 24;
        let hours = (total_minutes / 60) % 24;
        let minutes = total_minutes % 60;
        format!("{days}日{hours}時間{minutes}分")
    } else {
        OVERDUE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_remaining_ninety_minutes() {
        let now = base_now();
        let limit = now + Duration::minutes(90);
        assert_eq!(format_remaining(limit, now), "0日1時間30分");
    }

    #[test]
    fn test_remaining_overdue() {
        let now = base_now();
        let limit = now - Duration::minutes(1);
        assert_eq!(format_remaining(limit, now), OVERDUE);
    }

    #[test]
    fn test_remaining_exactly_now_is_overdue() {
        let now = base_now();
        assert_eq!(format_remaining(now, now), OVERDUE);
    }

    #[test]
    fn test_remaining_rolls_days_and_hours() {
        let now = base_now();
        let limit = now + Duration::days(2) + Duration::hours(25) + Duration::minutes(5);
        // 25 hours carries into the day column.
        assert_eq!(format_remaining(limit, now), "3日1時間5分");
    }

    #[test]
    fn test_remaining_sub_minute_is_zeroes() {
        let now = base_now();
        let limit = now + Duration::seconds(30);
        assert_eq!(format_remaining(limit, now), "0日0時間0分");
    }
}
