//! ddk-calendar
//!
//! Korean holiday calendar and business-day calculus.
//!
//! Layers, leaf first:
//! - [`LunarConverter`]: Korean lunisolar date → Gregorian date.
//! - [`HolidayCalendar`]: per-year [`HolidayTable`] (fixed, lunar and
//!   substitute holidays), memoized in an explicit [`HolidayCache`].
//! - [`BusinessDays`]: weekday/holiday stepping built on any [`HolidaySource`].
//!
//! Pure deterministic logic. No IO, no wall-clock. The only shared mutable
//! state is the per-year cache owned by whoever constructs the calendar.

mod business;
mod cache;
mod error;
mod holidays;
mod lunar;

pub use business::{
    is_weekend, last_day_of_month, BusinessDays, MAX_BUSINESS_DAY_SPAN, MAX_NON_BUSINESS_RUN,
};
pub use cache::{CacheStats, HolidayCache, DEFAULT_CACHE_CAPACITY};
pub use error::CalendarError;
pub use holidays::{
    build_holiday_table, Holiday, HolidayCalendar, HolidayKind, HolidaySource, HolidayTable,
};
pub use lunar::{ConversionError, LunarConverter, MAX_LUNAR_YEAR, MIN_LUNAR_YEAR};
