use ddk_calendar::CalendarError;
use std::fmt;

/// Errors raised while validating templates or generating reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Target year outside the supported generation range.
    YearOutOfRange { year: i32, min: i32, max: i32 },
    /// Recurrence string other than `once | monthly | quarterly`.
    UnknownRecurrence(String),
    /// A template item failed boundary validation.
    InvalidItem {
        index: usize,
        title: String,
        reason: String,
    },
    /// Template document could not be decoded.
    Parse(String),
    /// Template file could not be read.
    Io { path: String, message: String },
    /// Business-day arithmetic failed (step limit or date overflow).
    Calendar(CalendarError),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::YearOutOfRange { year, min, max } => {
                write!(f, "year {year} outside supported range {min}..={max}")
            }
            ScheduleError::UnknownRecurrence(s) => write!(
                f,
                "unknown recurrence '{s}'. expected one of: once | monthly | quarterly"
            ),
            ScheduleError::InvalidItem {
                index,
                title,
                reason,
            } => write!(f, "invalid template item #{index} '{title}': {reason}"),
            ScheduleError::Parse(msg) => write!(f, "template parse error: {msg}"),
            ScheduleError::Io { path, message } => write!(f, "io error reading {path}: {message}"),
            ScheduleError::Calendar(e) => write!(f, "calendar error: {e}"),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::Calendar(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CalendarError> for ScheduleError {
    fn from(e: CalendarError) -> Self {
        ScheduleError::Calendar(e)
    }
}
