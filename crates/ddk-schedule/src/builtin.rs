//! System templates shipped with the engine.

use crate::model::{DayOfMonth, DeadlinePolicy, Recurrence, TemplateDefinition, TemplateItem};

pub const BUILTIN_TEMPLATE_KEYS: [&str; 3] = ["tax", "payroll", "hr"];

/// Every built-in template, keyed as in [`BUILTIN_TEMPLATE_KEYS`].
pub fn builtin_templates() -> Vec<(&'static str, TemplateDefinition)> {
    vec![("tax", tax()), ("payroll", payroll()), ("hr", hr())]
}

pub fn builtin_template(key: &str) -> Option<TemplateDefinition> {
    match key {
        "tax" => Some(tax()),
        "payroll" => Some(payroll()),
        "hr" => Some(hr()),
        _ => None,
    }
}

fn following_month(m: u32) -> u32 {
    m % 12 + 1
}

fn tax() -> TemplateDefinition {
    let mut items = Vec::with_capacity(33);

    for m in 1..=12 {
        items.push(
            TemplateItem::once(
                format!("Withholding tax filing and payment for M{m:02}"),
                "withholding_tax",
                following_month(m),
                10,
            )
            .with_priority(2)
            .with_description(format!("Deadline for M{m:02} withholding tax return and payment")),
        );
    }
    for m in 1..=12 {
        items.push(
            TemplateItem::once(
                format!("Social insurance report for M{m:02}"),
                "social_insurance",
                following_month(m),
                15,
            )
            .with_priority(2)
            .with_description(format!(
                "Deadline for M{m:02} pension, health, employment and accident insurance reports"
            )),
        );
    }

    let once = |title: &str, category: &str, month, day, priority, description: &str| {
        TemplateItem::once(title, category, month, day)
            .with_priority(priority)
            .with_description(description)
    };
    items.extend([
        once(
            "VAT final return (2nd period)",
            "vat",
            1,
            25,
            3,
            "Final VAT return and payment for the previous second half-year",
        ),
        once(
            "VAT final return (1st period)",
            "vat",
            7,
            25,
            3,
            "Final VAT return and payment for the first half-year",
        ),
        once(
            "VAT preliminary return (1st period)",
            "vat",
            4,
            25,
            2,
            "Preliminary VAT return and payment for Q1",
        ),
        once(
            "VAT preliminary return (2nd period)",
            "vat",
            10,
            25,
            2,
            "Preliminary VAT return and payment for Q3",
        ),
        once(
            "Corporate income tax return",
            "corporate_tax",
            3,
            31,
            3,
            "Corporate tax return and payment for December year-end companies",
        ),
        once(
            "Individual income tax return",
            "income_tax",
            5,
            31,
            3,
            "Global income tax return and payment",
        ),
        once(
            "Local income tax return (individual)",
            "local_income_tax",
            5,
            31,
            2,
            "Individual local income tax return and payment",
        ),
        once(
            "Local income tax return (corporate)",
            "local_income_tax",
            4,
            30,
            2,
            "Corporate local income tax return and payment",
        ),
        once(
            "Year-end tax settlement refund claim",
            "year_end_settlement",
            3,
            10,
            3,
            "Refund claim for the previous year's employment income settlement",
        ),
    ]);

    TemplateDefinition {
        name: "Statutory filings".to_string(),
        description: Some(
            "Withholding, social insurance, VAT and income tax deadlines".to_string(),
        ),
        category: Some("tax".to_string()),
        items,
    }
}

fn payroll() -> TemplateDefinition {
    let payment = (1..=12).map(|m| {
        TemplateItem::new(format!("M{m:02} salary payment"), "payroll", Recurrence::Once)
            .with_month(m)
            .with_day(DayOfMonth::Last)
            .with_priority(3)
            .with_deadline(DeadlinePolicy::LastBusinessDayOfMonth)
            .with_description(format!("Salary payment day for M{m:02}"))
    });
    let confirmation = (1..=12).map(|m| {
        TemplateItem::new(format!("M{m:02} payroll confirmation"), "payroll", Recurrence::Once)
            .with_month(m)
            .with_day(DayOfMonth::Last)
            .with_priority(2)
            .with_deadline(DeadlinePolicy::BeforeLastBusinessDay { offset_days: -3 })
            .with_description(format!(
                "Confirm M{m:02} payroll, three business days before payment"
            ))
    });

    TemplateDefinition {
        name: "Payroll".to_string(),
        description: Some("Salary payment and related deadlines".to_string()),
        category: Some("payroll".to_string()),
        items: payment.chain(confirmation).collect(),
    }
}

fn hr() -> TemplateDefinition {
    TemplateDefinition {
        name: "HR operations".to_string(),
        description: Some("Recurring personnel and labour tasks".to_string()),
        category: Some("hr".to_string()),
        items: vec![
            TemplateItem::new("Social insurance enrolment report", "hr", Recurrence::Monthly)
                .with_day(DayOfMonth::Day(15))
                .with_priority(2)
                .with_description("Monthly enrolment and withdrawal report for joiners and leavers"),
            TemplateItem::new("Leave usage review", "hr", Recurrence::Quarterly)
                .with_day(DayOfMonth::Day(1))
                .with_quarters([1, 4, 7, 10])
                .with_holiday_adjustment(false)
                .with_priority(1)
                .with_description("Quarterly review of annual leave usage"),
            TemplateItem::once("Employment contract renewal check", "hr", 12, 15)
                .with_holiday_adjustment(false)
                .with_priority(2)
                .with_description("Identify employees whose contracts renew this year"),
        ],
    }
}
