//! Template → ordered reminder list.

use crate::error::ScheduleError;
use crate::model::{GeneratedReminder, TemplateDefinition};
use crate::resolver::RecurrenceResolver;
use ddk_calendar::{BusinessDays, HolidayCalendar};
use std::sync::Arc;
use tracing::debug;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

pub fn validate_year(year: i32) -> Result<(), ScheduleError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(ScheduleError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ReminderGenerator {
    resolver: RecurrenceResolver,
}

impl ReminderGenerator {
    pub fn new(days: BusinessDays) -> Self {
        Self {
            resolver: RecurrenceResolver::new(days),
        }
    }

    pub fn from_calendar(calendar: Arc<HolidayCalendar>) -> Self {
        Self::new(BusinessDays::new(calendar))
    }

    pub fn business_days(&self) -> &BusinessDays {
        self.resolver.business_days()
    }

    /// All reminders for `template` in `year`, ascending by deadline.
    ///
    /// The sort is stable: reminders sharing a deadline keep item order, then
    /// recurrence order within an item.
    pub fn generate(
        &self,
        template: &TemplateDefinition,
        year: i32,
    ) -> Result<Vec<GeneratedReminder>, ScheduleError> {
        validate_year(year)?;

        let mut out = Vec::new();
        for item in &template.items {
            out.extend(self.resolver.resolve(item, year)?);
        }
        out.sort_by_key(|r| r.deadline);

        debug!(
            template = %template.name,
            year,
            items = template.items.len(),
            reminders = out.len(),
            "reminders generated"
        );
        Ok(out)
    }
}

impl Default for ReminderGenerator {
    fn default() -> Self {
        Self::from_calendar(Arc::new(HolidayCalendar::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeadlinePolicy, Recurrence, TemplateItem};
    use ddk_calendar::{CalendarError, MAX_BUSINESS_DAY_SPAN};

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(validate_year(2000).is_ok());
        assert!(validate_year(2100).is_ok());
        assert_eq!(
            validate_year(1999),
            Err(ScheduleError::YearOutOfRange {
                year: 1999,
                min: 2000,
                max: 2100
            })
        );
        assert!(validate_year(2101).is_err());
    }

    #[test]
    fn ties_keep_item_order() {
        let t = TemplateDefinition::new(
            "t",
            vec![
                TemplateItem::once("b", "c", 6, 10),
                TemplateItem::once("a", "c", 1, 5),
                TemplateItem::once("c", "c", 6, 10),
            ],
        );
        let out = ReminderGenerator::default().generate(&t, 2026).unwrap();
        let titles: Vec<_> = out.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_template_yields_nothing() {
        let t = TemplateDefinition::new("empty", vec![]);
        assert!(ReminderGenerator::default().generate(&t, 2026).unwrap().is_empty());
        let t = TemplateDefinition::new(
            "x",
            vec![TemplateItem::new("no month", "c", Recurrence::Once)],
        );
        assert!(ReminderGenerator::default().generate(&t, 2026).unwrap().is_empty());
    }

    /// Templates built in code skip `validate`; the calendar still refuses
    /// the walk instead of stepping toward the end of chrono's range.
    #[test]
    fn unvalidated_huge_offset_fails_fast() {
        let t = TemplateDefinition::new(
            "t",
            vec![TemplateItem::once("runaway", "c", 6, 1).with_deadline(
                DeadlinePolicy::BeforeLastBusinessDay {
                    offset_days: -2_000_000_000,
                },
            )],
        );
        assert_eq!(
            ReminderGenerator::default().generate(&t, 2026),
            Err(ScheduleError::Calendar(CalendarError::SpanTooLarge {
                n: -2_000_000_000,
                limit: MAX_BUSINESS_DAY_SPAN
            }))
        );
    }
}
