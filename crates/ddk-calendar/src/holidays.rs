//! Korean public-holiday table.
//!
//! # Rules (applied in order)
//!
//! 1. Eight fixed solar holidays.
//! 2. Lunar holidays via [`LunarConverter`]: Seollal (lunar 1/1, ±1 day),
//!    Buddha's Birthday (lunar 4/8), Chuseok (lunar 8/15, ±1 day). A group
//!    whose conversion fails is omitted for that year.
//! 3. Substitute holidays:
//!    - Seollal / Chuseok: a Sunday inside the three-day window moves one day
//!      to the first free weekday after the window.
//!    - Children's Day: on a weekend, or shared with another holiday, moves to
//!      the next free weekday.
//!    - From 2021, Independence Movement Day, Liberation Day, National
//!      Foundation Day and Hangul Day: Saturday → +2 days, Sunday → +1 day,
//!      then forward past any labeled date.
//!
//! Labels are first-writer-wins: a later rule never overwrites a labeled
//! date.

use crate::cache::{CacheStats, HolidayCache, DEFAULT_CACHE_CAPACITY};
use crate::business::is_weekend;
use crate::lunar::LunarConverter;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::warn;

/// Substitute searches give up after this many days (never reached with
/// real calendars).
const MAX_SUBSTITUTE_SEARCH: u32 = 400;

/// First year the expanded substitute set applies.
const EXPANDED_SUBSTITUTE_FROM: i32 = 2021;

const FIXED_HOLIDAYS: [(u32, u32, &str); 8] = [
    (1, 1, "New Year's Day"),
    (3, 1, "Independence Movement Day"),
    (5, 5, "Children's Day"),
    (6, 6, "Memorial Day"),
    (8, 15, "Liberation Day"),
    (10, 3, "National Foundation Day"),
    (10, 9, "Hangul Day"),
    (12, 25, "Christmas Day"),
];

const EXPANDED_SUBSTITUTES: [(u32, u32, &str); 4] = [
    (3, 1, "Independence Movement Day"),
    (8, 15, "Liberation Day"),
    (10, 3, "National Foundation Day"),
    (10, 9, "Hangul Day"),
];

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// Which rule produced a holiday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    Fixed,
    Lunar,
    Substitute,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub name: String,
    pub kind: HolidayKind,
}

/// Immutable holiday mapping for one calendar year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HolidayTable {
    year: i32,
    entries: BTreeMap<NaiveDate, Holiday>,
}

impl HolidayTable {
    /// Table from explicit entries (custom sources, tests).
    pub fn new(year: i32, entries: BTreeMap<NaiveDate, Holiday>) -> Self {
        Self { year, entries }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Holiday> {
        self.entries.get(&date)
    }

    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(|h| h.name.as_str())
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &Holiday)> {
        self.entries.iter().map(|(d, h)| (*d, h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can hand out a year's holiday table.
///
/// `Send + Sync` so a single source can back many concurrent calculators
/// behind an `Arc`.
pub trait HolidaySource: Send + Sync {
    fn holidays_for_year(&self, year: i32) -> Arc<HolidayTable>;
}

// ---------------------------------------------------------------------------
// Calendar (cached)
// ---------------------------------------------------------------------------

/// Korean holiday calendar with an owned per-year cache.
#[derive(Debug)]
pub struct HolidayCalendar {
    converter: LunarConverter,
    cache: HolidayCache,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// `capacity = 0` disables memoization.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            converter: LunarConverter::new(),
            cache: HolidayCache::new(capacity),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl HolidaySource for HolidayCalendar {
    fn holidays_for_year(&self, year: i32) -> Arc<HolidayTable> {
        self.cache
            .get_or_compute(year, || build_holiday_table(&self.converter, year))
    }
}

// ---------------------------------------------------------------------------
// Table construction (pure)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
enum LunarGroup {
    Seollal,
    BuddhasBirthday,
    Chuseok,
}

impl LunarGroup {
    fn lunar_month_day(self) -> (u32, u32) {
        match self {
            LunarGroup::Seollal => (1, 1),
            LunarGroup::BuddhasBirthday => (4, 8),
            LunarGroup::Chuseok => (8, 15),
        }
    }

    fn name(self) -> &'static str {
        match self {
            LunarGroup::Seollal => "Seollal",
            LunarGroup::BuddhasBirthday => "Buddha's Birthday",
            LunarGroup::Chuseok => "Chuseok",
        }
    }

    /// Three-day groups carry an eve and a following day.
    fn is_three_day(self) -> bool {
        !matches!(self, LunarGroup::BuddhasBirthday)
    }
}

struct TableBuilder {
    year: i32,
    entries: BTreeMap<NaiveDate, Holiday>,
    /// Dates claimed by more than one rule.
    overlaps: BTreeSet<NaiveDate>,
}

impl TableBuilder {
    fn new(year: i32) -> Self {
        Self {
            year,
            entries: BTreeMap::new(),
            overlaps: BTreeSet::new(),
        }
    }

    fn insert(&mut self, date: NaiveDate, name: impl Into<String>, kind: HolidayKind) {
        match self.entries.entry(date) {
            Entry::Vacant(v) => {
                v.insert(Holiday {
                    name: name.into(),
                    kind,
                });
            }
            Entry::Occupied(_) => {
                self.overlaps.insert(date);
            }
        }
    }

    fn is_taken(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    /// First date on or after `start` that is unlabeled (and a weekday when
    /// `weekdays_only`).
    fn first_free(&self, start: NaiveDate, weekdays_only: bool) -> Option<NaiveDate> {
        let mut d = start;
        for _ in 0..MAX_SUBSTITUTE_SEARCH {
            if !self.is_taken(d) && !(weekdays_only && is_weekend(d)) {
                return Some(d);
            }
            d = d.succ_opt()?;
        }
        None
    }

    fn finish(self) -> HolidayTable {
        HolidayTable::new(self.year, self.entries)
    }
}

/// Compute the holiday table for `year` without caching.
///
/// Deterministic: the same year always yields an identical table.
pub fn build_holiday_table(converter: &LunarConverter, year: i32) -> HolidayTable {
    let mut b = TableBuilder::new(year);

    for (month, day, name) in FIXED_HOLIDAYS {
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            b.insert(d, name, HolidayKind::Fixed);
        }
    }

    let mut three_day_centers = Vec::with_capacity(2);
    for group in [
        LunarGroup::Seollal,
        LunarGroup::BuddhasBirthday,
        LunarGroup::Chuseok,
    ] {
        let (lm, ld) = group.lunar_month_day();
        let center = match converter.lunar_to_solar(year, lm, ld) {
            Ok(d) => d,
            Err(e) => {
                warn!(year, group = group.name(), error = %e, "lunar holiday omitted");
                continue;
            }
        };
        if group.is_three_day() {
            let holiday_name = format!("{} holiday", group.name());
            b.insert(center - Duration::days(1), holiday_name.as_str(), HolidayKind::Lunar);
            b.insert(center, group.name(), HolidayKind::Lunar);
            b.insert(center + Duration::days(1), holiday_name, HolidayKind::Lunar);
            three_day_centers.push((group, center));
        } else {
            b.insert(center, group.name(), HolidayKind::Lunar);
        }
    }

    for (group, center) in three_day_centers {
        add_three_day_substitute(&mut b, group, center);
    }
    add_childrens_day_substitute(&mut b);
    if year >= EXPANDED_SUBSTITUTE_FROM {
        add_expanded_substitutes(&mut b);
    }

    b.finish()
}

fn substitute_name(original: &str) -> String {
    format!("Substitute holiday ({original})")
}

fn add_three_day_substitute(b: &mut TableBuilder, group: LunarGroup, center: NaiveDate) {
    let window = [center - Duration::days(1), center, center + Duration::days(1)];
    if !window.iter().any(|d| d.weekday() == Weekday::Sun) {
        return;
    }
    if let Some(sub) = b.first_free(center + Duration::days(2), true) {
        b.insert(sub, substitute_name(group.name()), HolidayKind::Substitute);
    }
}

/// Children's Day gets a substitute only when it falls on a weekend or
/// shares its date with another holiday; a plain weekday gets none.
fn add_childrens_day_substitute(b: &mut TableBuilder) {
    let Some(childrens_day) = NaiveDate::from_ymd_opt(b.year, 5, 5) else {
        return;
    };
    if !is_weekend(childrens_day) && !b.overlaps.contains(&childrens_day) {
        return;
    }
    let Some(next) = childrens_day.succ_opt() else {
        return;
    };
    if let Some(sub) = b.first_free(next, true) {
        if sub != childrens_day {
            b.insert(sub, substitute_name("Children's Day"), HolidayKind::Substitute);
        }
    }
}

fn add_expanded_substitutes(b: &mut TableBuilder) {
    for (month, day, name) in EXPANDED_SUBSTITUTES {
        let Some(d) = NaiveDate::from_ymd_opt(b.year, month, day) else {
            continue;
        };
        let candidate = match d.weekday() {
            Weekday::Sat => d + Duration::days(2),
            Weekday::Sun => d + Duration::days(1),
            _ => continue,
        };
        if let Some(sub) = b.first_free(candidate, false) {
            b.insert(sub, substitute_name(name), HolidayKind::Substitute);
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
