use chrono::NaiveDate;
use std::fmt;

/// Errors surfaced by business-day arithmetic.
///
/// Lunar conversion failures never appear here: the holiday layer absorbs
/// them by omitting the affected holiday group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalendarError {
    /// Month outside `1..=12`.
    InvalidMonth { year: i32, month: u32 },
    /// Stepping left the range chrono can represent.
    DateOutOfRange(NaiveDate),
    /// More than `limit` consecutive non-business days were walked from `from`.
    StepLimitExceeded { from: NaiveDate, limit: u32 },
    /// `add_business_days` asked for more than `limit` business days.
    SpanTooLarge { n: i32, limit: u32 },
    /// `add_business_days` walked `budget` calendar days without reaching
    /// `n` business days.
    StepBudgetExceeded { from: NaiveDate, n: i32, budget: u64 },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::InvalidMonth { year, month } => {
                write!(f, "invalid month {month} for year {year}")
            }
            CalendarError::DateOutOfRange(d) => write!(f, "date arithmetic out of range at {d}"),
            CalendarError::StepLimitExceeded { from, limit } => write!(
                f,
                "no business day found within {limit} consecutive days from {from}"
            ),
            CalendarError::SpanTooLarge { n, limit } => {
                write!(f, "business-day offset {n} exceeds the limit of {limit}")
            }
            CalendarError::StepBudgetExceeded { from, n, budget } => write!(
                f,
                "moving {n} business days from {from} took more than {budget} steps"
            ),
        }
    }
}

impl std::error::Error for CalendarError {}
