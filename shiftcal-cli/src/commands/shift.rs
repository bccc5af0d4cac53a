use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use shiftcal_core::date_range::{DateRange, parse_date};
use shiftcal_core::shift::{Shift, ShiftType};

use super::Session;
use crate::render::Render;

pub fn set(
    session: &mut Session,
    date: &str,
    kind: ShiftType,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let date = parse_date(date)?;
    let (default_start, default_end) = session.config.shift_times.times_for(kind);
    let shift = Shift::new(
        date,
        kind,
        start.unwrap_or(default_start),
        end.unwrap_or(default_end),
    )?;

    session.shifts.save(shift.clone())?;
    println!("{} {}", date.format("%a %-d %b %Y").bold(), shift.render());
    Ok(())
}

pub fn delete(session: &mut Session, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    if session.shifts.delete(date)? {
        println!("Removed shift on {}", date.format("%a %-d %b %Y"));
    } else {
        println!("{}", format!("No shift on {}", date.format("%a %-d %b %Y")).dimmed());
    }
    Ok(())
}

pub fn list(session: &Session, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let range = DateRange::from_args(from, to, Local::now().date_naive())?;
    let shifts: Vec<&Shift> = session.shifts.in_range(&range).collect();

    if shifts.is_empty() {
        println!("{}", "No shifts found".dimmed());
        return Ok(());
    }

    for shift in shifts {
        let label = shift.date.format("%a %-d %b %Y").to_string();
        println!("{:<16} {}", label, shift.render());
    }
    Ok(())
}
