use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub trait Clock: Send + Sync {
    /// Current wall-clock time in the office's local time.
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemporalError {
    #[error("You cannot book an appointment for a time that has already passed today. Please select a future time.")]
    ElapsedToday,

    #[error("You cannot book an appointment for a date that has already passed. Please select today or a future date.")]
    PastDate,
}

/// Rejects appointments that are not strictly in the future. Only today's
/// bookings are compared by time of day, at minute precision: a slot equal to
/// the current minute counts as already past.
pub fn check_not_elapsed(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), TemporalError> {
    let today = now.date();
    if date < today {
        return Err(TemporalError::PastDate);
    }
    if date > today {
        return Ok(());
    }

    let now_minute = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    let slot = date.and_time(time);
    if slot > now_minute {
        Ok(())
    } else {
        Err(TemporalError::ElapsedToday)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_today_before_now_rejected() {
        let now = dt("2025-06-16 14:30:00");
        assert_eq!(
            check_not_elapsed(d("2025-06-16"), t(14, 0), now),
            Err(TemporalError::ElapsedToday)
        );
    }

    #[test]
    fn test_today_after_now_accepted() {
        let now = dt("2025-06-16 13:59:59");
        assert_eq!(check_not_elapsed(d("2025-06-16"), t(14, 0), now), Ok(()));
    }

    #[test]
    fn test_exact_minute_rejected() {
        assert_eq!(
            check_not_elapsed(d("2025-06-16"), t(14, 0), dt("2025-06-16 14:00:00")),
            Err(TemporalError::ElapsedToday)
        );
        assert_eq!(
            check_not_elapsed(d("2025-06-16"), t(14, 0), dt("2025-06-16 14:00:45")),
            Err(TemporalError::ElapsedToday)
        );
    }

    #[test]
    fn test_future_date_accepts_any_time() {
        let now = dt("2025-06-16 23:59:00");
        for (h, m) in [(0, 0), (6, 30), (14, 0), (23, 59)] {
            assert_eq!(check_not_elapsed(d("2025-06-17"), t(h, m), now), Ok(()));
        }
    }

    #[test]
    fn test_past_date_rejected() {
        let now = dt("2025-06-16 08:00:00");
        assert_eq!(
            check_not_elapsed(d("2025-06-15"), t(23, 0), now),
            Err(TemporalError::PastDate)
        );
    }
}
