//! View models: grid cells joined with the shifts and events they show.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};

use crate::constants::DAYS_PER_WEEK;
use crate::date_range::DateRange;
use crate::event::{CalendarEvent, bucket_by_hour, events_on};
use crate::grid::{ViewMode, day_bounds, is_same_day, month_grid_for, week_dates};
use crate::shift::Shift;

/// One date with everything shown on it.
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    pub shift: Option<&'a Shift>,
    pub events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Clone)]
pub struct HourSlot<'a> {
    pub hour: u32,
    pub events: Vec<&'a CalendarEvent>,
}

#[derive(Debug, Clone)]
pub enum Layout<'a> {
    Month {
        year: i32,
        month: u32,
        weeks: Vec<[Option<DayCell<'a>>; DAYS_PER_WEEK]>,
    },
    Week {
        days: Vec<DayCell<'a>>,
    },
    Day {
        cell: DayCell<'a>,
        all_day: Vec<&'a CalendarEvent>,
        hours: Vec<HourSlot<'a>>,
    },
}

#[derive(Debug, Clone)]
pub struct CalendarView<'a> {
    pub reference: NaiveDate,
    pub mode: ViewMode,
    pub range: DateRange,
    pub layout: Layout<'a>,
}

impl<'a> CalendarView<'a> {
    /// Lays out `mode` around `reference`. Events are attached to the local
    /// date (in `tz`) of their start only.
    pub fn build<Tz: TimeZone>(
        reference: NaiveDate,
        mode: ViewMode,
        today: NaiveDate,
        shifts: &'a BTreeMap<NaiveDate, Shift>,
        events: &'a [CalendarEvent],
        tz: &Tz,
    ) -> Self {
        let cell = |date: NaiveDate| DayCell {
            date,
            is_today: is_same_day(&date, &today),
            shift: shifts.get(&date),
            events: events_on(events, date, tz),
        };

        let layout = match mode {
            ViewMode::Month => {
                let grid = month_grid_for(reference);
                Layout::Month {
                    year: grid.year,
                    month: grid.month,
                    weeks: grid
                        .weeks
                        .into_iter()
                        .map(|week| week.map(|slot| slot.map(&cell)))
                        .collect(),
                }
            }
            ViewMode::Week => Layout::Week {
                days: week_dates(reference).into_iter().map(&cell).collect(),
            },
            ViewMode::Day => {
                let bounds = day_bounds(reference);
                let day = cell(bounds.date);
                let (all_day, by_hour) = bucket_by_hour(&day.events, tz);
                let hours = bounds
                    .hours
                    .zip(by_hour)
                    .map(|(hour, events)| HourSlot { hour, events })
                    .collect();
                Layout::Day {
                    cell: day,
                    all_day,
                    hours,
                }
            }
        };

        CalendarView {
            reference,
            mode,
            range: DateRange::for_view(reference, mode),
            layout,
        }
    }

    /// Heading for the view, e.g. "February 2024".
    pub fn title(&self) -> String {
        match &self.layout {
            Layout::Month { year, month, .. } => NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| format!("{year}-{month:02}")),
            Layout::Week { days } => match (days.first(), days.last()) {
                (Some(first), Some(last)) => format!(
                    "{} – {}",
                    first.date.format("%a %-d %b"),
                    last.date.format("%a %-d %b %Y")
                ),
                _ => String::new(),
            },
            Layout::Day { cell, .. } => cell.date.format("%A %-d %B %Y").to_string(),
        }
    }

    /// Every cell in display order.
    pub fn cells(&self) -> Vec<&DayCell<'a>> {
        match &self.layout {
            Layout::Month { weeks, .. } => weeks.iter().flat_map(|w| w.iter().flatten()).collect(),
            Layout::Week { days } => days.iter().collect(),
            Layout::Day { cell, .. } => vec![cell],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventSource;
    use crate::shift::ShiftType;
    use chrono::{Duration, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, y: i32, m: u32, d: u32, h: u32) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            start,
            end: start + Duration::hours(3),
            all_day: false,
            source: EventSource::Local,
            description: None,
            location: None,
        }
    }

    fn shifts() -> BTreeMap<NaiveDate, Shift> {
        let mut shifts = BTreeMap::new();
        for (day, kind) in [(1, ShiftType::Morning), (29, ShiftType::RestDay)] {
            shifts.insert(date(2024, 2, day), Shift::with_default_times(date(2024, 2, day), kind));
        }
        shifts
    }

    #[test]
    fn test_month_view_attaches_shifts_events_and_today() {
        let shifts = shifts();
        let events = vec![event("late", 2024, 2, 29, 22), event("other-month", 2024, 3, 1, 9)];

        let view = CalendarView::build(date(2024, 2, 10), ViewMode::Month, date(2024, 2, 29), &shifts, &events, &Utc);

        assert_eq!(view.title(), "February 2024");
        assert_eq!(view.range, DateRange::new(date(2024, 2, 1), date(2024, 3, 1)));

        let cells = view.cells();
        assert_eq!(cells.len(), 29);
        assert_eq!(cells[0].shift.map(|s| s.shift_type), Some(ShiftType::Morning));

        let last = cells[28];
        assert!(last.is_today);
        assert_eq!(last.events.len(), 1, "event ending in March stays on Feb 29");
        assert_eq!(cells.iter().filter(|c| c.is_today).count(), 1);
    }

    #[test]
    fn test_week_view_spans_month_boundary() {
        let shifts = shifts();
        let events = vec![event("march", 2024, 3, 1, 9)];

        let view = CalendarView::build(date(2024, 2, 28), ViewMode::Week, date(2024, 1, 1), &shifts, &events, &Utc);

        let Layout::Week { days } = &view.layout else {
            panic!("expected week layout");
        };
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, date(2024, 2, 26));
        assert_eq!(days[3].shift.map(|s| s.shift_type), Some(ShiftType::RestDay));
        assert_eq!(days[4].events.len(), 1);
        assert!(days.iter().all(|d| !d.is_today));
    }

    #[test]
    fn test_day_view_buckets_by_start_hour() {
        let shifts = BTreeMap::new();
        let mut holiday = event("holiday", 2024, 2, 10, 0);
        holiday.all_day = true;
        let events = vec![event("a", 2024, 2, 10, 9), event("b", 2024, 2, 10, 9), holiday];

        let view = CalendarView::build(date(2024, 2, 10), ViewMode::Day, date(2024, 2, 10), &shifts, &events, &Utc);

        let Layout::Day { cell, all_day, hours } = &view.layout else {
            panic!("expected day layout");
        };
        assert!(cell.is_today);
        assert_eq!(all_day.len(), 1);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[9].hour, 9);
        assert_eq!(hours[9].events.len(), 2);
        assert_eq!(hours.iter().map(|h| h.events.len()).sum::<usize>(), 2);
    }
}
