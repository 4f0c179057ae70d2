//! Template and reminder value types.
//!
//! Everything here is immutable once built. Templates deserialize from YAML
//! (see [`crate::load_template_yaml`]); reminders serialize with ISO dates.

use crate::error::ScheduleError;
use chrono::NaiveDate;
use ddk_calendar::last_day_of_month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Months a quarterly item fires in when no override is given.
pub const DEFAULT_QUARTER_MONTHS: [u32; 4] = [1, 4, 7, 10];

/// Largest `|offset|` a `before_last_business_day` deadline may carry.
pub const MAX_DEADLINE_OFFSET: i32 = 31;

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Once,
    Monthly,
    Quarterly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Monthly => "monthly",
            Recurrence::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Recurrence::Once),
            "monthly" => Ok(Recurrence::Monthly),
            "quarterly" => Ok(Recurrence::Quarterly),
            _ => Err(ScheduleError::UnknownRecurrence(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Deadline policy
// ---------------------------------------------------------------------------

/// How a one-off item's deadline is derived before holiday adjustment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeadlinePolicy {
    /// The calendar date `(year, month, day)`.
    #[default]
    Fixed,
    /// Last business day of `month`. Never holiday-adjusted afterwards.
    #[serde(rename = "last_business_day")]
    LastBusinessDayOfMonth,
    /// `offset_days` business days from the last business day of `month`
    /// (negative = earlier).
    BeforeLastBusinessDay {
        #[serde(rename = "offset")]
        offset_days: i32,
    },
}

// ---------------------------------------------------------------------------
// Day of month
// ---------------------------------------------------------------------------

/// Day component of an item: a fixed day number or the month's last day.
///
/// YAML accepts `15`, `"last"`, or `-1` (same as `"last"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DayRepr", into = "DayRepr")]
pub enum DayOfMonth {
    Day(u32),
    Last,
}

impl DayOfMonth {
    /// Calendar date for this day in `(year, month)`, `None` when it does not
    /// exist (e.g. day 31 in April).
    pub fn resolve(self, year: i32, month: u32) -> Option<NaiveDate> {
        match self {
            DayOfMonth::Day(d) => NaiveDate::from_ymd_opt(year, month, d),
            DayOfMonth::Last => last_day_of_month(year, month),
        }
    }

    pub fn is_valid(self) -> bool {
        match self {
            DayOfMonth::Day(d) => (1..=31).contains(&d),
            DayOfMonth::Last => true,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DayRepr {
    Number(i64),
    Word(String),
}

impl TryFrom<DayRepr> for DayOfMonth {
    type Error = String;

    fn try_from(r: DayRepr) -> Result<Self, Self::Error> {
        match r {
            DayRepr::Number(-1) => Ok(DayOfMonth::Last),
            DayRepr::Number(n) if (1..=31).contains(&n) => Ok(DayOfMonth::Day(n as u32)),
            DayRepr::Number(n) => Err(format!("day {n} outside 1..=31")),
            DayRepr::Word(w) if w.trim().eq_ignore_ascii_case("last") => Ok(DayOfMonth::Last),
            DayRepr::Word(w) => Err(format!("day '{w}' is neither a number nor 'last'")),
        }
    }
}

impl From<DayOfMonth> for DayRepr {
    fn from(d: DayOfMonth) -> Self {
        match d {
            DayOfMonth::Day(n) => DayRepr::Number(i64::from(n)),
            DayOfMonth::Last => DayRepr::Word("last".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Template item
// ---------------------------------------------------------------------------

fn default_adjust_for_holiday() -> bool {
    true
}

/// One declarative recurring-obligation rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<DayOfMonth>,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default = "default_adjust_for_holiday")]
    pub adjust_for_holiday: bool,
    #[serde(default)]
    pub priority: u8,
    pub category: String,
    #[serde(default)]
    pub deadline: DeadlinePolicy,
    /// Quarterly override; `None` means [`DEFAULT_QUARTER_MONTHS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarters: Option<BTreeSet<u32>>,
}

impl TemplateItem {
    pub fn new(title: impl Into<String>, category: impl Into<String>, recurrence: Recurrence) -> Self {
        Self {
            title: title.into(),
            description: None,
            month: None,
            day: None,
            recurrence,
            adjust_for_holiday: true,
            priority: 0,
            category: category.into(),
            deadline: DeadlinePolicy::Fixed,
            quarters: None,
        }
    }

    pub fn once(title: impl Into<String>, category: impl Into<String>, month: u32, day: u32) -> Self {
        Self::new(title, category, Recurrence::Once)
            .with_month(month)
            .with_day(DayOfMonth::Day(day))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: DayOfMonth) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_holiday_adjustment(mut self, adjust: bool) -> Self {
        self.adjust_for_holiday = adjust;
        self
    }

    pub fn with_deadline(mut self, policy: DeadlinePolicy) -> Self {
        self.deadline = policy;
        self
    }

    pub fn with_quarters(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.quarters = Some(months.into_iter().collect());
        self
    }

    /// Months a quarterly item fires in, ascending.
    pub fn quarter_months(&self) -> Vec<u32> {
        match &self.quarters {
            Some(q) => q.iter().copied().collect(),
            None => DEFAULT_QUARTER_MONTHS.to_vec(),
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".into());
        }
        if self.category.trim().is_empty() {
            return Err("category is empty".into());
        }
        if let Some(m) = self.month {
            if !(1..=12).contains(&m) {
                return Err(format!("month {m} outside 1..=12"));
            }
        }
        if let Some(d) = self.day {
            if !d.is_valid() {
                return Err(format!("day {d:?} outside 1..=31"));
            }
        }
        match (&self.quarters, self.recurrence) {
            (Some(_), r) if r != Recurrence::Quarterly => {
                return Err(format!("quarters given for a {r} item"));
            }
            (Some(q), _) => {
                if let Some(bad) = q.iter().find(|m| !(1..=12).contains(*m)) {
                    return Err(format!("quarter month {bad} outside 1..=12"));
                }
            }
            (None, _) => {}
        }
        if self.recurrence != Recurrence::Once && self.deadline != DeadlinePolicy::Fixed {
            return Err(format!(
                "deadline policy {:?} only applies to once items",
                self.deadline
            ));
        }
        if let DeadlinePolicy::BeforeLastBusinessDay { offset_days } = self.deadline {
            if !(-MAX_DEADLINE_OFFSET..=MAX_DEADLINE_OFFSET).contains(&offset_days) {
                return Err(format!(
                    "deadline offset {offset_days} outside -{MAX_DEADLINE_OFFSET}..={MAX_DEADLINE_OFFSET}"
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Template definition
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub items: Vec<TemplateItem>,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>, items: Vec<TemplateItem>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            items,
        }
    }

    /// Boundary validation. The engine itself assumes validated items.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (index, item) in self.items.iter().enumerate() {
            item.check().map_err(|reason| ScheduleError::InvalidItem {
                index,
                title: item.title.clone(),
                reason,
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One concrete deadline produced for a target year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedReminder {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    /// Final deadline, after holiday adjustment.
    pub deadline: NaiveDate,
    /// Pre-adjustment date; present only when adjustment moved it.
    pub original_deadline: Option<NaiveDate>,
    pub priority: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_parses_case_insensitively() {
        assert_eq!("Monthly".parse::<Recurrence>(), Ok(Recurrence::Monthly));
        assert_eq!(" once ".parse::<Recurrence>(), Ok(Recurrence::Once));
        assert_eq!(
            "weekly".parse::<Recurrence>(),
            Err(ScheduleError::UnknownRecurrence("weekly".into()))
        );
    }

    #[test]
    fn day_resolves_last_and_rejects_missing_days() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        assert_eq!(DayOfMonth::Last.resolve(2026, 2), ymd(2026, 2, 28));
        assert_eq!(DayOfMonth::Day(31).resolve(2026, 4), None);
        assert_eq!(DayOfMonth::Day(15).resolve(2026, 4), ymd(2026, 4, 15));
    }

    #[test]
    fn default_quarters_apply_without_override() {
        let item = TemplateItem::new("review", "hr", Recurrence::Quarterly);
        assert_eq!(item.quarter_months(), vec![1, 4, 7, 10]);
        let item = item.with_quarters([12, 3, 3]);
        assert_eq!(item.quarter_months(), vec![3, 12]);
    }

    #[test]
    fn validation_rejects_misplaced_fields() {
        let monthly_with_quarters = TemplateItem::new("x", "c", Recurrence::Monthly).with_quarters([1]);
        let t = TemplateDefinition::new("t", vec![monthly_with_quarters]);
        assert!(matches!(t.validate(), Err(ScheduleError::InvalidItem { index: 0, .. })));

        let bad_month = TemplateItem::once("x", "c", 13, 1);
        let t = TemplateDefinition::new("t", vec![TemplateItem::once("ok", "c", 1, 1), bad_month]);
        assert!(matches!(t.validate(), Err(ScheduleError::InvalidItem { index: 1, .. })));

        let monthly_policy = TemplateItem::new("x", "c", Recurrence::Monthly)
            .with_deadline(DeadlinePolicy::LastBusinessDayOfMonth);
        let t = TemplateDefinition::new("t", vec![monthly_policy]);
        assert!(t.validate().is_err());
    }

    #[test]
    fn deadline_offset_is_bounded() {
        let with_offset = |offset_days| {
            TemplateDefinition::new(
                "t",
                vec![TemplateItem::once("x", "c", 6, 1)
                    .with_deadline(DeadlinePolicy::BeforeLastBusinessDay { offset_days })],
            )
        };
        assert!(with_offset(-MAX_DEADLINE_OFFSET).validate().is_ok());
        assert!(with_offset(MAX_DEADLINE_OFFSET).validate().is_ok());
        assert!(matches!(
            with_offset(-MAX_DEADLINE_OFFSET - 1).validate(),
            Err(ScheduleError::InvalidItem { index: 0, .. })
        ));
        assert!(with_offset(i32::MIN).validate().is_err());
    }
}
