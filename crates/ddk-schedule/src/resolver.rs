//! Expands one template item into concrete reminders for a year.

use crate::error::ScheduleError;
use crate::model::{DayOfMonth, DeadlinePolicy, GeneratedReminder, Recurrence, TemplateItem};
use chrono::NaiveDate;
use ddk_calendar::BusinessDays;

#[derive(Clone, Debug)]
pub struct RecurrenceResolver {
    days: BusinessDays,
}

impl RecurrenceResolver {
    pub fn new(days: BusinessDays) -> Self {
        Self { days }
    }

    pub fn business_days(&self) -> &BusinessDays {
        &self.days
    }

    /// Reminders for `item` in `year`, in emission order.
    ///
    /// Ill-formed occurrences (no month on a once item, a day that does not
    /// exist in a given month) are skipped, not reported.
    pub fn resolve(
        &self,
        item: &TemplateItem,
        year: i32,
    ) -> Result<Vec<GeneratedReminder>, ScheduleError> {
        match item.recurrence {
            Recurrence::Once => Ok(self.resolve_once(item, year)?.into_iter().collect()),
            Recurrence::Monthly => self.resolve_months(item, year, 1..=12, |m| format!("M{m:02}")),
            Recurrence::Quarterly => {
                self.resolve_months(item, year, item.quarter_months(), |m| {
                    format!("Q{}", (m - 1) / 3 + 1)
                })
            }
        }
    }

    fn resolve_once(
        &self,
        item: &TemplateItem,
        year: i32,
    ) -> Result<Option<GeneratedReminder>, ScheduleError> {
        let month = match item.month {
            Some(m) if (1..=12).contains(&m) => m,
            _ => return Ok(None),
        };

        match item.deadline {
            DeadlinePolicy::LastBusinessDayOfMonth => {
                let deadline = self.days.last_business_day_of_month(year, month)?;
                Ok(Some(reminder(item, item.title.clone(), deadline, None)))
            }
            DeadlinePolicy::BeforeLastBusinessDay { offset_days } => {
                let last = self.days.last_business_day_of_month(year, month)?;
                let deadline = self.days.add_business_days(last, offset_days)?;
                Ok(Some(reminder(item, item.title.clone(), deadline, None)))
            }
            DeadlinePolicy::Fixed => {
                let Some(day) = item.day else {
                    return Ok(None);
                };
                let Some(date) = fixed_date(year, month, day) else {
                    return Ok(None);
                };
                self.adjusted(item, item.title.clone(), date).map(Some)
            }
        }
    }

    fn resolve_months<I, P>(
        &self,
        item: &TemplateItem,
        year: i32,
        months: I,
        prefix: P,
    ) -> Result<Vec<GeneratedReminder>, ScheduleError>
    where
        I: IntoIterator<Item = u32>,
        P: Fn(u32) -> String,
    {
        let day = item.day.unwrap_or(DayOfMonth::Day(1));
        let mut out = Vec::new();
        for month in months {
            let Some(date) = day.resolve(year, month) else {
                continue;
            };
            let title = format!("{} {}", prefix(month), item.title);
            out.push(self.adjusted(item, title, date)?);
        }
        Ok(out)
    }

    /// Applies holiday adjustment and records the pre-adjustment date only
    /// when it moved.
    fn adjusted(
        &self,
        item: &TemplateItem,
        title: String,
        date: NaiveDate,
    ) -> Result<GeneratedReminder, ScheduleError> {
        let deadline = if item.adjust_for_holiday {
            self.days.next_business_day(date)?
        } else {
            date
        };
        let original = (deadline != date).then_some(date);
        Ok(reminder(item, title, deadline, original))
    }
}

/// Calendar date for a fixed once item. Feb 29/30/31 that does not exist
/// falls back to Mar 1.
fn fixed_date(year: i32, month: u32, day: DayOfMonth) -> Option<NaiveDate> {
    match (day.resolve(year, month), day) {
        (Some(d), _) => Some(d),
        (None, DayOfMonth::Day(n)) if month == 2 && n > 28 => NaiveDate::from_ymd_opt(year, 3, 1),
        (None, _) => None,
    }
}

fn reminder(
    item: &TemplateItem,
    title: String,
    deadline: NaiveDate,
    original_deadline: Option<NaiveDate>,
) -> GeneratedReminder {
    GeneratedReminder {
        title,
        description: item.description.clone(),
        category: item.category.clone(),
        deadline,
        original_deadline,
        priority: item.priority,
    }
}
