use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use owo_colors::OwoColorize;
use shiftcal_core::event::NewEvent;

use super::Session;
use crate::render::Render;

pub struct EventInput {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub all_day: bool,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// A date or a date with a time, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum When {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

const DATETIME_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn parse_when(s: &str) -> Result<When> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(When::DateTime(dt));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(When::Date)
        .with_context(|| format!("Invalid date '{s}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM"))
}

fn to_utc<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => Ok(dt.with_timezone(&Utc)),
        None => bail!("{naive} does not exist in the local timezone"),
    }
}

/// Resolve the typed bounds into (start, end, all_day). Date-only input makes
/// an all-day event that runs until the midnight after its last date.
fn resolve_times<Tz: TimeZone>(
    start: When,
    end: Option<When>,
    all_day: bool,
    tz: &Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>, bool)> {
    let all_day = all_day || matches!(start, When::Date(_));

    let start_naive = match start {
        When::Date(date) => date.and_time(chrono::NaiveTime::MIN),
        When::DateTime(dt) if all_day => dt.date().and_time(chrono::NaiveTime::MIN),
        When::DateTime(dt) => dt,
    };

    let end_naive = match end {
        Some(When::Date(date)) => date.and_time(chrono::NaiveTime::MIN) + Duration::days(1),
        Some(When::DateTime(dt)) => dt,
        None if all_day => start_naive + Duration::days(1),
        None => start_naive + Duration::hours(1),
    };

    Ok((to_utc(start_naive, tz)?, to_utc(end_naive, tz)?, all_day))
}

pub fn add(session: &mut Session, input: EventInput) -> Result<()> {
    let start = parse_when(&input.start)?;
    let end = input.end.as_deref().map(parse_when).transpose()?;
    let (start, end, all_day) = resolve_times(start, end, input.all_day, &Local)?;

    let event = session.events.add(NewEvent {
        title: input.title,
        start,
        end,
        all_day,
        description: input.description,
        location: input.location,
    })?;

    let date = event.start_date(&Local).format("%a %-d %b %Y").to_string();
    println!("{} {}", date.bold(), event.render());
    println!("  {}", format!("id: {}", event.id).dimmed());
    Ok(())
}

pub fn remove(session: &mut Session, id: &str) -> Result<()> {
    if session.events.remove(id)? {
        println!("Removed event {id}");
    } else {
        println!("{}", format!("No event with id {id}").dimmed());
    }
    Ok(())
}

pub fn list(session: &Session) -> Result<()> {
    let mut events: Vec<_> = session.events.all().iter().collect();
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }
    events.sort_by_key(|e| e.start);

    let mut current_date = None;
    for event in events {
        let date = event.start_date(&Local);
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %-d %b %Y").bold());
            current_date = Some(date);
        }
        println!("  {} {}", event.render(), event.id.dimmed());
    }
    Ok(())
}
