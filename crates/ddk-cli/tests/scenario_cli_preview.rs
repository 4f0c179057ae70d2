//! `ddk` end-to-end.
//!
//! Validates:
//! - holidays / business-day / generate print the expected key=value lines.
//! - --json output parses and carries ISO dates.
//! - Config layers (flag and DDK_CONFIG) add template files and are hashed.
//! - Bad input (unknown template, out-of-range year, invalid month) fails
//!   with a readable error on stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn ddk() -> Command {
    let mut cmd = Command::cargo_bin("ddk").unwrap();
    cmd.env_remove("DDK_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn base_config() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/defaults/base.yaml").to_string()
}

// ---------------------------------------------------------------------------
// holidays
// ---------------------------------------------------------------------------

#[test]
fn holidays_2026_lists_substitutes() {
    ddk()
        .args(["holidays", "--year", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("year=2026 holidays=18"))
        .stdout(predicate::str::contains(
            "date=2026-03-02 weekday=Mon kind=substitute",
        ))
        .stdout(predicate::str::contains("date=2026-02-17 weekday=Tue kind=lunar"));
}

#[test]
fn holidays_json_is_keyed_by_iso_date() {
    let out = ddk()
        .args(["holidays", "--year", "2026", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["year"], 2026);
    assert_eq!(v["entries"]["2026-01-01"]["kind"], "fixed");
}

// ---------------------------------------------------------------------------
// business-day
// ---------------------------------------------------------------------------

#[test]
fn business_day_next_skips_weekend() {
    ddk()
        .args(["business-day", "next", "--date", "2026-01-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("next_business_day=2026-01-05"));
}

#[test]
fn business_day_add_and_prev() {
    ddk()
        .args(["business-day", "add", "--date", "2026-01-05", "--days", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("business_day=2026-01-12"));

    ddk()
        .args(["business-day", "add", "--date", "2026-01-30", "--days", "-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("business_day=2026-01-27"));

    ddk()
        .args(["business-day", "prev", "--date", "2026-02-18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prev_business_day=2026-02-13"));
}

#[test]
fn last_of_month_and_invalid_month() {
    ddk()
        .args(["business-day", "last-of-month", "--year", "2026", "--month", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last_business_day=2026-01-30"));

    ddk()
        .args(["business-day", "last-of-month", "--year", "2026", "--month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month 13"));
}

#[test]
fn malformed_date_is_rejected_by_the_parser() {
    ddk()
        .args(["business-day", "next", "--date", "2026-13-01"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// templates / generate
// ---------------------------------------------------------------------------

#[test]
fn templates_lists_builtins() {
    ddk()
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("templates=3"))
        .stdout(predicate::str::contains("key=tax source=builtin items=33"))
        .stdout(predicate::str::contains("key=payroll source=builtin items=24"));
}

#[test]
fn generate_payroll_2026() {
    ddk()
        .args(["generate", "--template", "payroll", "--year", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reminders=24"))
        .stdout(predicate::str::contains(
            "deadline=2026-01-30 original_deadline= priority=3 category=payroll title=M01 salary payment",
        ));
}

#[test]
fn generate_tax_json_reports_original_deadlines() {
    let out = ddk()
        .args(["generate", "--template", "tax", "--year", "2026", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let reminders = v["reminders"].as_array().unwrap();
    assert_eq!(reminders.len(), 33);
    assert_eq!(reminders[0]["deadline"], "2026-01-12");
    assert_eq!(reminders[0]["original_deadline"], "2026-01-10");
}

#[test]
fn generate_rejects_bad_input() {
    ddk()
        .args(["generate", "--template", "nope", "--year", "2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown template 'nope'"));

    ddk()
        .args(["generate", "--template", "tax", "--year", "1999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("year 1999 outside supported range"));

    ddk().args(["generate", "--year", "2026"]).assert().failure();
}

#[test]
fn generate_from_file() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        f,
        "name: Close\nitems:\n  - title: Close books\n    category: finance\n    recurrence: quarterly\n    day: last\n"
    )
    .unwrap();

    ddk()
        .args(["generate", "--year", "2026", "--file"])
        .arg(f.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("template=Close year=2026 reminders=4"))
        .stdout(predicate::str::contains("title=Q1 Close books"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn configured_template_files_are_listed_and_generated() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = dir.path().join("close.yaml");
    std::fs::write(
        &tpl,
        "name: Month-end close\nitems:\n  - title: Close books\n    category: finance\n    recurrence: monthly\n    day: 25\n",
    )
    .unwrap();
    let overlay = dir.path().join("local.yaml");
    std::fs::write(
        &overlay,
        format!(
            "templates:\n  include_builtin: false\n  paths: [\"{}\"]\n",
            tpl.display()
        ),
    )
    .unwrap();

    ddk()
        .args(["--config", base_config().as_str(), "--config"])
        .arg(&overlay)
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("templates=1"))
        .stdout(predicate::str::contains("key=close"));

    // Same layers through the env var.
    ddk()
        .env("DDK_CONFIG", format!("{},{}", base_config(), overlay.display()))
        .args(["generate", "--template", "close", "--year", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reminders=12"));
}

#[test]
fn unused_config_keys_warn_but_do_not_fail() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "holidays:\n  cache_capacity: 2\n  region: kr\n").unwrap();

    ddk()
        .arg("--config")
        .arg(f.path())
        .args(["business-day", "next", "--date", "2026-01-03"])
        .assert()
        .success()
        .stderr(predicate::str::contains("/holidays/region"));
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    ddk()
        .args(["config-hash", base_config().as_str()])
        .assert()
        .success()
        .stdout(predicate::str::is_match("config_hash=[0-9a-f]{64}").unwrap())
        .stdout(predicate::str::contains("\"cache_capacity\":32"));
}
