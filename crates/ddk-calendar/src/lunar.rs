//! Korean lunisolar → Gregorian conversion.
//!
//! Deterministic astronomy, no lookup tables.
//!
//! # Reckoning
//!
//! - A lunar month begins on the civil day (Asia/Seoul) of the new moon.
//! - The month containing the December solstice (solar longitude 270°) is
//!   month 11.
//! - When 13 months separate two consecutive month-11s, the first month after
//!   month 11 that contains no principal solar term (longitude a multiple of
//!   30°) is a leap month and repeats the preceding month number.
//!
//! New moons use the mean-lunation series with periodic and planetary
//! corrections (Meeus, *Astronomical Algorithms*, ch. 49). Solar longitude
//! uses the low-precision series (ch. 25), good to about 0.01°.
//!
//! Only non-leap months are addressable; leap-month dates are never needed by
//! the holiday rules.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Seoul;
use std::fmt;

/// First supported lunar year. Korea has kept UTC+9 civil time since
/// August 1961.
pub const MIN_LUNAR_YEAR: i32 = 1962;

/// Last supported lunar year (ΔT polynomial coverage).
pub const MAX_LUNAR_YEAR: i32 = 2149;

const J2000: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECS_PER_DAY: f64 = 86_400.0;

/// Lunations per Julian year; `k = 0` is the new moon of 2000-01-06.
const LUNATIONS_PER_YEAR: f64 = 12.3685;

/// New moons sampled per solstice-to-solstice window. Starts mid-October of
/// the previous year and runs past the following January.
const LUNATIONS_SAMPLED: i64 = 17;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure to resolve a lunar date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionError {
    /// Lunar year outside [`MIN_LUNAR_YEAR`]..=[`MAX_LUNAR_YEAR`].
    YearOutOfRange(i32),
    /// Month/day combination that does not exist in that lunar year.
    InvalidLunarDate { year: i32, month: u32, day: u32 },
    /// Month framing could not be established (solstice months not found).
    Unresolved { year: i32, reason: &'static str },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::YearOutOfRange(y) => write!(
                f,
                "lunar year {y} outside supported range {MIN_LUNAR_YEAR}..={MAX_LUNAR_YEAR}"
            ),
            ConversionError::InvalidLunarDate { year, month, day } => {
                write!(f, "invalid lunar date {year}-{month:02}-{day:02}")
            }
            ConversionError::Unresolved { year, reason } => {
                write!(f, "lunar year {year} unresolved: {reason}")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Stateless Korean lunar → solar converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct LunarConverter;

/// One lunar month inside a solstice-to-solstice window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LunarMonth {
    number: u32,
    leap: bool,
    start: NaiveDate,
    days: u32,
}

impl LunarConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a non-leap lunar `(year, month, day)` to its Gregorian date.
    pub fn lunar_to_solar(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<NaiveDate, ConversionError> {
        if !(MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&year) {
            return Err(ConversionError::YearOutOfRange(year));
        }
        let invalid = ConversionError::InvalidLunarDate { year, month, day };
        if !(1..=12).contains(&month) || !(1..=30).contains(&day) {
            return Err(invalid);
        }

        // Months 11 and 12 of lunar year Y open the window that ends at the
        // solstice of Y+1.
        let window_year = if month >= 11 { year + 1 } else { year };
        let months = solstice_window(window_year)?;

        let m = months
            .iter()
            .find(|m| m.number == month && !m.leap)
            .ok_or(ConversionError::Unresolved {
                year,
                reason: "month not present in solstice window",
            })?;
        if day > m.days {
            return Err(invalid);
        }
        m.start
            .checked_add_days(chrono::Days::new(u64::from(day - 1)))
            .ok_or(invalid)
    }
}

/// Lunar months from month 11 containing the solstice of `year - 1` up to
/// (excluding) month 11 containing the solstice of `year`.
fn solstice_window(year: i32) -> Result<Vec<LunarMonth>, ConversionError> {
    let unresolved = |reason| ConversionError::Unresolved { year, reason };

    let approx = f64::from(year - 1) + 9.5 / 12.0 - 2000.0;
    let k0 = (approx * LUNATIONS_PER_YEAR).floor() as i64;

    let mut starts = Vec::with_capacity(LUNATIONS_SAMPLED as usize);
    for k in k0..k0 + LUNATIONS_SAMPLED {
        starts.push(new_moon_civil_date(k).ok_or(unresolved("new moon out of range"))?);
    }

    let mut terms = Vec::with_capacity(starts.len());
    for d in &starts {
        terms.push(principal_term_index(*d).ok_or(unresolved("local midnight missing"))?);
    }

    // Month i spans [starts[i], starts[i + 1]).
    let month_count = starts.len() - 1;
    let has_term = |i: usize| terms[i] != terms[i + 1];
    // 270° crossed inside the month. A month holding two principal terms
    // jumps straight from sector 7 to 9 (late 2033).
    let holds_solstice = |i: usize| terms[i] <= 8 && terms[i + 1] >= 9;

    let mut solstice_months = (0..month_count).filter(|&i| holds_solstice(i));
    let first = solstice_months
        .next()
        .ok_or(unresolved("first solstice month not found"))?;
    let second = solstice_months
        .next()
        .ok_or(unresolved("second solstice month not found"))?;

    let leap_index = match second - first {
        12 => None,
        13 => Some(
            (first + 1..second)
                .find(|&i| !has_term(i))
                .ok_or(unresolved("leap window without a termless month"))?,
        ),
        _ => return Err(unresolved("solstice months are not 12 or 13 apart")),
    };

    let mut out = Vec::with_capacity(second - first);
    let mut number = 11;
    for i in first..second {
        let leap = Some(i) == leap_index;
        if i > first && !leap {
            number = number % 12 + 1;
        }
        let days = (starts[i + 1] - starts[i]).num_days() as u32;
        out.push(LunarMonth {
            number,
            leap,
            start: starts[i],
            days,
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Civil time helpers
// ---------------------------------------------------------------------------

/// Civil date in Asia/Seoul on which new moon `k` occurs.
fn new_moon_civil_date(k: i64) -> Option<NaiveDate> {
    let jde = new_moon_jde(k as f64);
    let jd_ut = jde - delta_t_seconds(decimal_year(jde)) / SECS_PER_DAY;
    let secs = ((jd_ut - UNIX_EPOCH_JD) * SECS_PER_DAY).round() as i64;
    let utc: DateTime<Utc> = DateTime::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(&Seoul).date_naive())
}

/// Index (0..12) of the 30° solar-longitude sector at Seoul midnight
/// opening `date`.
fn principal_term_index(date: NaiveDate) -> Option<i32> {
    let midnight = Seoul
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let jd_ut = midnight.timestamp() as f64 / SECS_PER_DAY + UNIX_EPOCH_JD;
    let jde = jd_ut + delta_t_seconds(decimal_year(jd_ut)) / SECS_PER_DAY;
    Some((sun_apparent_longitude(jde) / 30.0).floor() as i32)
}

fn decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000) / 365.25
}

/// TT − UT in seconds (Espenak–Meeus polynomials).
fn delta_t_seconds(y: f64) -> f64 {
    if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if y < 2050.0 {
        let t = y - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
    }
}

// ---------------------------------------------------------------------------
// Astronomy
// ---------------------------------------------------------------------------

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

/// Julian Ephemeris Day of true new moon number `k`.
fn new_moon_jde(k: f64) -> f64 {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mut jde = 2_451_550.09766 + 29.530588861 * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;

    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let mp = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4;
    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3
        + 0.000000011 * t4;
    let om = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;

    jde += -0.40720 * sin_deg(mp)
        + 0.17241 * e * sin_deg(m)
        + 0.01608 * sin_deg(2.0 * mp)
        + 0.01039 * sin_deg(2.0 * f)
        + 0.00739 * e * sin_deg(mp - m)
        - 0.00514 * e * sin_deg(mp + m)
        + 0.00208 * e * e * sin_deg(2.0 * m)
        - 0.00111 * sin_deg(mp - 2.0 * f)
        - 0.00057 * sin_deg(mp + 2.0 * f)
        + 0.00056 * e * sin_deg(2.0 * mp + m)
        - 0.00042 * sin_deg(3.0 * mp)
        + 0.00042 * e * sin_deg(m + 2.0 * f)
        + 0.00038 * e * sin_deg(m - 2.0 * f)
        - 0.00024 * e * sin_deg(2.0 * mp - m)
        - 0.00017 * sin_deg(om)
        - 0.00007 * sin_deg(mp + 2.0 * m)
        + 0.00004 * sin_deg(2.0 * mp - 2.0 * f)
        + 0.00004 * sin_deg(3.0 * m)
        + 0.00003 * sin_deg(mp + m - 2.0 * f)
        + 0.00003 * sin_deg(2.0 * mp + 2.0 * f)
        - 0.00003 * sin_deg(mp + m + 2.0 * f)
        + 0.00003 * sin_deg(mp - m + 2.0 * f)
        - 0.00002 * sin_deg(mp - m - 2.0 * f)
        - 0.00002 * sin_deg(3.0 * mp + m)
        + 0.00002 * sin_deg(4.0 * mp);

    // Planetary arguments.
    const PLANETARY: [(f64, f64, f64); 14] = [
        (299.77, 0.107408, 0.000325),
        (251.88, 0.016321, 0.000165),
        (251.83, 26.651886, 0.000164),
        (349.42, 36.412478, 0.000126),
        (84.66, 18.206239, 0.000110),
        (141.74, 53.303771, 0.000062),
        (207.14, 2.453732, 0.000060),
        (154.84, 7.306860, 0.000056),
        (34.52, 27.261239, 0.000047),
        (207.19, 0.121824, 0.000042),
        (291.34, 1.844379, 0.000040),
        (161.72, 24.198154, 0.000037),
        (239.56, 25.513099, 0.000035),
        (331.55, 3.592518, 0.000023),
    ];
    for (i, (base, rate, coeff)) in PLANETARY.iter().enumerate() {
        let mut arg = base + rate * k;
        if i == 0 {
            arg -= 0.009173 * t2;
        }
        jde += coeff * sin_deg(arg);
    }

    jde
}

/// Apparent geocentric solar longitude in degrees, `[0, 360)`.
fn sun_apparent_longitude(jde: f64) -> f64 {
    let t = (jde - J2000) / 36_525.0;
    let l0 = 280.46646 + 36_000.76983 * t + 0.0003032 * t * t;
    let m = 357.52911 + 35_999.05029 * t - 0.0001537 * t * t;
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * sin_deg(m)
        + (0.019993 - 0.000101 * t) * sin_deg(2.0 * m)
        + 0.000289 * sin_deg(3.0 * m);
    let omega = 125.04 - 1_934.136 * t;
    let apparent = l0 + c - 0.00569 - 0.00478 * sin_deg(omega);
    apparent.rem_euclid(360.0)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
