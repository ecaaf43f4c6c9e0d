use chrono::{Days, NaiveDate};

/// Calendar-day offset used for response deadlines. Saturates at the end of
/// the calendar instead of overflowing.
pub(crate) fn due_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_after_adds_calendar_days() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(due_after(date, 1), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(due_after(date, 3), NaiveDate::from_ymd_opt(2026, 1, 3).unwrap());
    }
}
