use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Monday-to-Friday working week. Holidays are not modeled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusinessCalendar;

impl BusinessCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Check if a date is a business day
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Find the next business day after a given date.
    ///
    /// `None` when that day lies past `NaiveDate::MAX`.
    pub fn next_business_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut current = from.checked_add_days(Days::new(1))?;
        while !self.is_business_day(current) {
            current = current.checked_add_days(Days::new(1))?;
        }
        Some(current)
    }

    /// Advance `from` by `days` business days.
    ///
    /// Each step moves forward one calendar day and only business days are
    /// counted, so the result is a business day whenever `days > 0`. With
    /// `days <= 0` the input is returned as-is, even on a weekend. Returns
    /// `None` when the result falls outside the representable date range.
    pub fn add_business_days(&self, from: NaiveDate, days: i64) -> Option<NaiveDate> {
        if days <= 0 {
            return Some(from);
        }

        let mut current = from;
        let mut remaining = days;

        // From a weekend the first business day reached is the first counted one.
        if !self.is_business_day(current) {
            current = self.next_business_day(current)?;
            remaining -= 1;
        }

        // Whole weeks first, then walk the remainder.
        if remaining > 5 {
            let weeks = (remaining - 1) / 5;
            let calendar_days = u64::try_from(weeks).ok()?.checked_mul(7)?;
            current = current.checked_add_days(Days::new(calendar_days))?;
            remaining -= weeks * 5;
        }
        while remaining > 0 {
            current = current.checked_add_days(Days::new(1))?;
            if self.is_business_day(current) {
                remaining -= 1;
            }
        }
        Some(current)
    }

    /// Count business days in `(start, end]`; the inverse of `add_business_days`.
    pub fn business_days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        let mut current = start;
        while current < end {
            // current < end, so the successor exists
            let Some(next) = current.succ_opt() else {
                break;
            };
            current = next;
            if self.is_business_day(current) {
                count += 1;
            }
        }
        count
    }
}

/// `add_business_days` on the default calendar.
pub fn add_business_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    BusinessCalendar.add_business_days(date, days)
}
