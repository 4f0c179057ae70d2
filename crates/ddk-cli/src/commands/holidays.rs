//! `ddk holidays`.

use super::Context;
use anyhow::{Context as _, Result};
use ddk_calendar::{HolidayKind, HolidaySource};

pub fn list(ctx: &Context, year: i32, json: bool) -> Result<()> {
    let table = ctx.calendar.holidays_for_year(year);

    if json {
        let s = serde_json::to_string_pretty(&*table).context("serialize holiday table failed")?;
        println!("{s}");
        return Ok(());
    }

    println!("year={} holidays={}", table.year(), table.len());
    for (date, h) in table.iter() {
        let kind = match h.kind {
            HolidayKind::Fixed => "fixed",
            HolidayKind::Lunar => "lunar",
            HolidayKind::Substitute => "substitute",
        };
        println!("date={date} weekday={} kind={kind} name={}", date.format("%a"), h.name);
    }
    Ok(())
}
