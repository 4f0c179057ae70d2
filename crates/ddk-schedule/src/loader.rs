//! YAML template loader.
//!
//! Document shape:
//!
//! ```yaml
//! name: Month-end close
//! category: finance
//! items:
//!   - title: Close the books
//!     category: finance
//!     recurrence: monthly      # once | monthly | quarterly (default: once)
//!     day: last                # 1..=31, -1 or "last"
//!   - title: Salary payment
//!     category: payroll
//!     month: 6
//!     deadline: { type: last_business_day }
//!   - title: Payroll confirmation
//!     category: payroll
//!     month: 6
//!     deadline: { type: before_last_business_day, offset: -3 }
//! ```
//!
//! Unknown keys are rejected. Every loaded template is validated before it
//! is returned.

use std::fs;
use std::path::Path;

use crate::error::ScheduleError;
use crate::model::TemplateDefinition;

/// Load and validate a template from a YAML file on disk.
pub fn load_template_file(path: impl AsRef<Path>) -> Result<TemplateDefinition, ScheduleError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| ScheduleError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    load_template_yaml(&s)
}

/// Parse and validate a template from YAML text.
pub fn load_template_yaml(yaml: &str) -> Result<TemplateDefinition, ScheduleError> {
    let template: TemplateDefinition =
        serde_yaml::from_str(yaml).map_err(|e| ScheduleError::Parse(e.to_string()))?;
    template.validate()?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayOfMonth, DeadlinePolicy, Recurrence};

    #[test]
    fn parses_policies_and_day_forms() {
        let t = load_template_yaml(
            r#"
name: t
items:
  - title: a
    category: c
    recurrence: monthly
    day: last
  - title: b
    category: c
    month: 6
    day: -1
    deadline: { type: before_last_business_day, offset: -2 }
  - title: c
    category: c
    month: 2
    day: 30
    adjust_for_holiday: false
"#,
        )
        .unwrap();

        assert_eq!(t.items.len(), 3);
        assert_eq!(t.items[0].recurrence, Recurrence::Monthly);
        assert_eq!(t.items[0].day, Some(DayOfMonth::Last));
        assert_eq!(t.items[1].day, Some(DayOfMonth::Last));
        assert_eq!(
            t.items[1].deadline,
            DeadlinePolicy::BeforeLastBusinessDay { offset_days: -2 }
        );
        assert!(t.items[0].adjust_for_holiday);
        assert!(!t.items[2].adjust_for_holiday);
        assert_eq!(t.items[2].day, Some(DayOfMonth::Day(30)));
    }

    #[test]
    fn rejects_unknown_fields_and_recurrences() {
        let unknown_field = "name: t\nitems:\n  - title: a\n    category: c\n    extra_config: {}\n";
        assert!(matches!(
            load_template_yaml(unknown_field),
            Err(ScheduleError::Parse(_))
        ));

        let weekly = "name: t\nitems:\n  - title: a\n    category: c\n    recurrence: weekly\n";
        assert!(matches!(load_template_yaml(weekly), Err(ScheduleError::Parse(_))));

        let bad_day = "name: t\nitems:\n  - title: a\n    category: c\n    day: 32\n";
        assert!(matches!(load_template_yaml(bad_day), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn validation_runs_after_parse() {
        let y = "name: t\nitems:\n  - title: a\n    category: c\n    month: 13\n";
        assert!(matches!(
            load_template_yaml(y),
            Err(ScheduleError::InvalidItem { index: 0, .. })
        ));
    }

    #[test]
    fn huge_deadline_offset_is_rejected_at_load() {
        let y = r#"
name: t
items:
  - title: ok
    category: c
    month: 6
  - title: runaway
    category: c
    month: 6
    deadline: { type: before_last_business_day, offset: -2000000000 }
"#;
        match load_template_yaml(y) {
            Err(ScheduleError::InvalidItem { index, reason, .. }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("-2000000000"), "{reason}");
            }
            other => panic!("expected InvalidItem, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_template_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ScheduleError::Io { .. }));
    }
}
