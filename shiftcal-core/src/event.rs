//! Calendar events, from manual entry or from iCal feeds.
//!
//! Events are immutable once built. Feed events are rebuilt from scratch on
//! every refresh.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::HOURS_PER_DAY;
use crate::error::{ShiftCalError, ShiftCalResult};

/// Where an event came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Local,
    Feed(String),
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Local => f.write_str("local"),
            EventSource::Feed(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    pub source: EventSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CalendarEvent {
    /// Local calendar date of the start instant. Multi-day events only
    /// belong to this date.
    pub fn start_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.start.with_timezone(tz).date_naive()
    }

    pub fn start_hour<Tz: TimeZone>(&self, tz: &Tz) -> u32 {
        self.start.with_timezone(tz).hour()
    }

    /// "09:30" in `tz`, or "all-day".
    pub fn render_start_time<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        if self.all_day {
            "all-day".to_string()
        } else {
            self.start.with_timezone(tz).format("%H:%M").to_string()
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// User input for a manually entered event, validated before it is stored.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl NewEvent {
    /// Checks the input and assigns a fresh id.
    pub fn into_event(self) -> ShiftCalResult<CalendarEvent> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ShiftCalError::Validation("Event title is required".into()));
        }
        if self.end < self.start {
            return Err(ShiftCalError::Validation(format!(
                "Event end {} is before start {}",
                self.end, self.start
            )));
        }

        Ok(CalendarEvent {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            start: self.start,
            end: self.end,
            all_day: self.all_day,
            source: EventSource::Local,
            description: self.description,
            location: self.location,
        })
    }
}

/// Events whose start falls on `date` in `tz`, ordered by start.
pub fn events_on<'a, Tz: TimeZone>(
    events: &'a [CalendarEvent],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a CalendarEvent> {
    let mut on_date: Vec<&CalendarEvent> = events
        .iter()
        .filter(|e| e.start_date(tz) == date)
        .collect();
    on_date.sort_by_key(|e| e.start);
    on_date
}

/// Splits the events of one day into all-day events and 24 hour buckets
/// keyed by hour of start.
pub fn bucket_by_hour<'a, Tz: TimeZone>(
    events: &[&'a CalendarEvent],
    tz: &Tz,
) -> (Vec<&'a CalendarEvent>, Vec<Vec<&'a CalendarEvent>>) {
    let mut all_day = Vec::new();
    let mut hours: Vec<Vec<&CalendarEvent>> = vec![Vec::new(); HOURS_PER_DAY];

    for &event in events {
        if event.all_day {
            all_day.push(event);
        } else {
            hours[event.start_hour(tz) as usize].push(event);
        }
    }

    (all_day, hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn event(title: &str, start: DateTime<Utc>, hours: i64) -> CalendarEvent {
        CalendarEvent {
            id: title.to_lowercase(),
            title: title.to_string(),
            start,
            end: start + Duration::hours(hours),
            all_day: false,
            source: EventSource::Local,
            description: None,
            location: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_event_spanning_midnight_belongs_to_start_date_only() {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 22, 0, 0).unwrap();
        let events = vec![event("Night", start, 5)];

        assert_eq!(events_on(&events, date(2024, 2, 10), &Utc).len(), 1);
        assert!(events_on(&events, date(2024, 2, 11), &Utc).is_empty());
    }

    #[test]
    fn test_bucketing_uses_local_date() {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 23, 30, 0).unwrap();
        let events = vec![event("Late", start, 1)];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert!(events_on(&events, date(2024, 2, 10), &plus_two).is_empty());
        assert_eq!(events_on(&events, date(2024, 2, 11), &plus_two).len(), 1);
        assert_eq!(events[0].start_hour(&plus_two), 1);
    }

    #[test]
    fn test_events_on_sorted_by_start() {
        let events = vec![
            event("Second", Utc.with_ymd_and_hms(2024, 2, 10, 15, 0, 0).unwrap(), 1),
            event("First", Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap(), 1),
        ];
        let titles: Vec<_> = events_on(&events, date(2024, 2, 10), &Utc)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_bucket_by_hour() {
        let mut holiday = event("Holiday", Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap(), 24);
        holiday.all_day = true;
        let standup = event("Standup", Utc.with_ymd_and_hms(2024, 2, 10, 9, 15, 0).unwrap(), 1);
        let review = event("Review", Utc.with_ymd_and_hms(2024, 2, 10, 9, 45, 0).unwrap(), 1);
        let refs = vec![&holiday, &standup, &review];

        let (all_day, hours) = bucket_by_hour(&refs, &Utc);
        assert_eq!(all_day.len(), 1);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[9].len(), 2);
        assert!(hours[0].is_empty());
    }

    #[test]
    fn test_new_event_requires_title() {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let input = NewEvent {
            title: "   ".into(),
            start,
            end: start,
            all_day: false,
            description: None,
            location: None,
        };
        assert!(matches!(input.into_event(), Err(ShiftCalError::Validation(_))));
    }

    #[test]
    fn test_new_event_rejects_end_before_start() {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let input = NewEvent {
            title: "Dentist".into(),
            start,
            end: start - Duration::minutes(30),
            all_day: false,
            description: None,
            location: None,
        };
        assert!(input.into_event().is_err());
    }

    #[test]
    fn test_new_event_gets_local_source_and_id() {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let event = NewEvent {
            title: " Dentist ".into(),
            start,
            end: start + Duration::hours(1),
            all_day: false,
            description: None,
            location: Some("Main St".into()),
        }
        .into_event()
        .unwrap();

        assert_eq!(event.title, "Dentist");
        assert_eq!(event.source, EventSource::Local);
        assert!(!event.id.is_empty());
    }
}
