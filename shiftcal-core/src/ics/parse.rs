//! ICS feed parsing using the icalendar crate's parser.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{ShiftCalError, ShiftCalResult};
use crate::event::{CalendarEvent, EventSource};

/// Parse every VEVENT of a feed into events tagged with `source`.
///
/// Floating times and dates resolve in `tz`. VEVENTs without UID or a
/// readable DTSTART are skipped; text that is not iCalendar at all is an error.
pub fn parse_feed<Tz: TimeZone>(
    content: &str,
    source: &EventSource,
    tz: &Tz,
) -> ShiftCalResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(ShiftCalError::IcsParse)?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| {
            let event = parse_vevent(vevent, source, tz);
            if event.is_none() {
                tracing::debug!(%source, "skipping VEVENT without UID or DTSTART");
            }
            event
        })
        .collect();

    Ok(events)
}

fn parse_vevent<Tz: TimeZone>(vevent: &Component, source: &EventSource, tz: &Tz) -> Option<CalendarEvent> {
    let uid = vevent.find_prop("UID")?.val.to_string();
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| "(No title)".to_string());

    let start_value = DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?;
    let all_day = matches!(start_value, DatePerhapsTime::Date(_));
    let start = to_utc(start_value, tz)?;

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .and_then(|end| to_utc(end, tz))
        .unwrap_or_else(|| if all_day { start + Duration::days(1) } else { start });

    let description = vevent.find_prop("DESCRIPTION").map(|p| unescape_text(p.val.as_ref()));
    let location = vevent.find_prop("LOCATION").map(|p| unescape_text(p.val.as_ref()));

    Some(CalendarEvent {
        id: uid,
        title,
        start,
        end,
        all_day,
        source: source.clone(),
        description,
        location,
    })
}

/// Resolve an ICS date or date-time to an instant.
fn to_utc<Tz: TimeZone>(dpt: DatePerhapsTime, tz: &Tz) -> Option<DateTime<Utc>> {
    match dpt {
        DatePerhapsTime::Date(date) => local_midnight(date, tz),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => Some(dt),
            CalendarDateTime::Floating(naive) => from_local(naive, tz),
            CalendarDateTime::WithTimezone { date_time, tzid } => match tzid.parse::<chrono_tz::Tz>() {
                Ok(zone) => from_local(date_time, &zone),
                Err(_) => {
                    tracing::debug!(%tzid, "unknown TZID; treating as local time");
                    from_local(date_time, tz)
                }
            },
        },
    }
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    from_local(date.and_hms_opt(0, 0, 0)?, tz)
}

/// Local wall time to UTC. Times inside a DST gap move forward one hour.
fn from_local<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
