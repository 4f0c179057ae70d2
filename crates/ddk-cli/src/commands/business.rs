//! `ddk business-day ...`.

use super::Context;
use anyhow::Result;
use chrono::NaiveDate;

pub fn next(ctx: &Context, date: NaiveDate) -> Result<()> {
    let out = ctx.business_days().next_business_day(date)?;
    println!("input={date} next_business_day={out}");
    Ok(())
}

pub fn prev(ctx: &Context, date: NaiveDate) -> Result<()> {
    let out = ctx.business_days().prev_business_day(date)?;
    println!("input={date} prev_business_day={out}");
    Ok(())
}

pub fn add(ctx: &Context, date: NaiveDate, days: i32) -> Result<()> {
    let out = ctx.business_days().add_business_days(date, days)?;
    println!("input={date} days={days} business_day={out}");
    Ok(())
}

pub fn last_of_month(ctx: &Context, year: i32, month: u32) -> Result<()> {
    let bd = ctx.business_days();
    let last = bd.last_business_day_of_month(year, month)?;
    let count = bd.business_days_in_month(year, month)?.len();
    println!("year={year} month={month} last_business_day={last} business_days={count}");
    Ok(())
}
