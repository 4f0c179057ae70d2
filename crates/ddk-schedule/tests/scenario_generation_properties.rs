//! Generation properties across years and template files.
//!
//! Validates:
//! - Output is non-decreasing by deadline for every supported year.
//! - Two runs with the same inputs are deeply equal.
//! - Years outside 2000..=2100 are rejected before any item is resolved.
//! - Templates loaded from YAML files behave like built-in ones.
//! - One generator can be shared across threads.
//! - Payroll deadlines are business days in every supported year, including
//!   2033/2034 around the leap 11th lunar month.

use chrono::NaiveDate;
use ddk_calendar::{BusinessDays, HolidayCalendar};
use ddk_schedule::*;
use std::io::Write;
use std::sync::Arc;
use std::thread;

fn generator() -> ReminderGenerator {
    ReminderGenerator::new(BusinessDays::new(Arc::new(HolidayCalendar::new())))
}

#[test]
fn output_is_sorted_for_every_year() {
    let gen = generator();
    for (key, t) in builtin_templates() {
        for year in (MIN_YEAR..=MAX_YEAR).step_by(7) {
            let out = gen.generate(&t, year).unwrap();
            assert!(
                out.windows(2).all(|w| w[0].deadline <= w[1].deadline),
                "{key} {year} not sorted"
            );
        }
    }
}

#[test]
fn payroll_lands_on_business_days_every_year() {
    let gen = generator();
    let payroll = builtin_template("payroll").unwrap();
    for year in MIN_YEAR..=MAX_YEAR {
        for r in gen.generate(&payroll, year).unwrap() {
            assert!(
                gen.business_days().is_business_day(r.deadline),
                "{year} {} on {}",
                r.title,
                r.deadline
            );
        }
    }
}

#[test]
fn payroll_2033_skips_seollal() {
    // Seollal 2033 is Mon 01-31; the window runs Sun 01-30..Tue 02-01.
    let out = generator()
        .generate(&builtin_template("payroll").unwrap(), 2033)
        .unwrap();
    let salary = out.iter().find(|r| r.title == "M01 salary payment").unwrap();
    assert_eq!(salary.deadline, NaiveDate::from_ymd_opt(2033, 1, 28).unwrap());
}

#[test]
fn generation_is_idempotent() {
    let gen = generator();
    let tax = builtin_template("tax").unwrap();
    for year in [2000, 2021, 2026, 2100] {
        assert_eq!(gen.generate(&tax, year).unwrap(), gen.generate(&tax, year).unwrap());
    }

    // A fresh calendar yields the same result as a warm one.
    assert_eq!(
        generator().generate(&tax, 2031).unwrap(),
        gen.generate(&tax, 2031).unwrap()
    );
}

#[test]
fn out_of_range_years_fail_fast() {
    let gen = generator();
    let tax = builtin_template("tax").unwrap();
    for year in [1999, 2101, -5] {
        assert!(matches!(
            gen.generate(&tax, year),
            Err(ScheduleError::YearOutOfRange { .. })
        ));
    }
}

#[test]
fn yaml_file_template_generates() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        f,
        r#"
name: Month-end close
category: finance
items:
  - title: Close the books
    category: finance
    recurrence: monthly
    day: last
    adjust_for_holiday: false
  - title: Board pack
    category: finance
    recurrence: quarterly
    day: 10
    quarters: [3, 6, 9, 12]
  - title: Audit fee
    category: finance
    month: 2
    day: 29
    adjust_for_holiday: false
"#
    )
    .unwrap();

    let t = load_template_file(f.path()).unwrap();
    assert_eq!(t.name, "Month-end close");
    let out = generator().generate(&t, 2026).unwrap();
    assert_eq!(out.len(), 12 + 4 + 1);

    let audit = out.iter().find(|r| r.title == "Audit fee").unwrap();
    assert_eq!(audit.deadline, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

    let titles: Vec<_> = out
        .iter()
        .filter(|r| r.title.ends_with("Board pack"))
        .map(|r| r.title.clone())
        .collect();
    assert_eq!(titles, vec!["Q1 Board pack", "Q2 Board pack", "Q3 Board pack", "Q4 Board pack"]);
}

#[test]
fn reminders_serialize_with_iso_dates() {
    let out = generator()
        .generate(&builtin_template("payroll").unwrap(), 2026)
        .unwrap();
    let v = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(v["deadline"], "2026-01-27");
    assert_eq!(v["original_deadline"], serde_json::Value::Null);
    assert_eq!(v["category"], "payroll");
}

#[test]
fn generator_is_shareable_across_threads() {
    let gen = generator();
    let payroll = builtin_template("payroll").unwrap();
    let expected = gen.generate(&payroll, 2027).unwrap();

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| assert_eq!(gen.generate(&payroll, 2027).unwrap(), expected));
        }
    });
}
