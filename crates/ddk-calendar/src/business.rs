//! Business-day calculus.
//!
//! A business day is Monday–Friday and not in that year's holiday table.
//! Every stepping loop gives up after [`MAX_NON_BUSINESS_RUN`] consecutive
//! non-business days and reports [`CalendarError::StepLimitExceeded`].
//! `add_business_days` also caps `|n|` at [`MAX_BUSINESS_DAY_SPAN`] and its
//! total walk at `2 * |n| + MAX_NON_BUSINESS_RUN` calendar days.

use crate::error::CalendarError;
use crate::holidays::HolidaySource;
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;
use std::sync::Arc;

/// Longest run of non-business days any stepping operation will walk.
pub const MAX_NON_BUSINESS_RUN: u32 = 400;

/// Largest `|n|` accepted by `add_business_days` (about forty years).
pub const MAX_BUSINESS_DAY_SPAN: u32 = 10_000;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Final calendar day of `month`, or `None` for an invalid month/year.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = match month {
        12 => NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?,
        1..=11 => NaiveDate::from_ymd_opt(year, month + 1, 1)?,
        _ => return None,
    };
    first_of_next.pred_opt()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        let next = match self {
            Direction::Forward => date.succ_opt(),
            Direction::Backward => date.pred_opt(),
        };
        next.ok_or(CalendarError::DateOutOfRange(date))
    }
}

/// Business-day calculator over a shared [`HolidaySource`].
#[derive(Clone)]
pub struct BusinessDays {
    holidays: Arc<dyn HolidaySource>,
}

impl fmt::Debug for BusinessDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessDays").finish_non_exhaustive()
    }
}

impl BusinessDays {
    pub fn new(holidays: Arc<dyn HolidaySource>) -> Self {
        Self { holidays }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.holidays_for_year(date.year()).contains(date)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// `date` itself when it is a business day, otherwise the next one.
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.settle(date, Direction::Forward)
    }

    /// `date` itself when it is a business day, otherwise the previous one.
    pub fn prev_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.settle(date, Direction::Backward)
    }

    /// Move `n` business days from `date` (backwards when `n < 0`).
    ///
    /// The start date is never counted; non-business days are skipped
    /// without consuming the budget. `n = 0` returns `date` unchanged even
    /// when it is not a business day.
    pub fn add_business_days(&self, date: NaiveDate, n: i32) -> Result<NaiveDate, CalendarError> {
        let dir = if n >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let mut remaining = n.unsigned_abs();
        if remaining > MAX_BUSINESS_DAY_SPAN {
            return Err(CalendarError::SpanTooLarge {
                n,
                limit: MAX_BUSINESS_DAY_SPAN,
            });
        }
        let budget = 2 * u64::from(remaining) + u64::from(MAX_NON_BUSINESS_RUN);
        let mut steps = 0u64;
        let mut d = date;
        let mut run = 0u32;
        while remaining > 0 {
            steps += 1;
            if steps > budget {
                return Err(CalendarError::StepBudgetExceeded {
                    from: date,
                    n,
                    budget,
                });
            }
            d = dir.step(d)?;
            if self.is_business_day(d) {
                remaining -= 1;
                run = 0;
            } else {
                run += 1;
                if run > MAX_NON_BUSINESS_RUN {
                    return Err(CalendarError::StepLimitExceeded {
                        from: date,
                        limit: MAX_NON_BUSINESS_RUN,
                    });
                }
            }
        }
        Ok(d)
    }

    /// Last business day on or before the final calendar day of the month.
    pub fn last_business_day_of_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<NaiveDate, CalendarError> {
        let last = last_day_of_month(year, month)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        self.prev_business_day(last)
    }

    /// Every business day of the month, ascending.
    pub fn business_days_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        let invalid = CalendarError::InvalidMonth { year, month };
        let last = last_day_of_month(year, month).ok_or(invalid.clone())?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid)?;
        Ok(first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| self.is_business_day(*d))
            .collect())
    }

    fn settle(&self, date: NaiveDate, dir: Direction) -> Result<NaiveDate, CalendarError> {
        let mut d = date;
        for _ in 0..=MAX_NON_BUSINESS_RUN {
            if self.is_business_day(d) {
                return Ok(d);
            }
            d = dir.step(d)?;
        }
        Err(CalendarError::StepLimitExceeded {
            from: date,
            limit: MAX_NON_BUSINESS_RUN,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_day_handles_december_and_february() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(last_day_of_month(2026, 12), Some(ymd(2026, 12, 31)));
        assert_eq!(last_day_of_month(2026, 2), Some(ymd(2026, 2, 28)));
        assert_eq!(last_day_of_month(2028, 2), Some(ymd(2028, 2, 29)));
        assert_eq!(last_day_of_month(2026, 4), Some(ymd(2026, 4, 30)));
        assert_eq!(last_day_of_month(2026, 0), None);
        assert_eq!(last_day_of_month(2026, 13), None);
    }

    #[test]
    fn weekend_detection() {
        let sat = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        assert!(is_weekend(sat));
        assert!(is_weekend(sat.succ_opt().unwrap()));
        assert!(!is_weekend(sat + chrono::Duration::days(2)));
    }
}
