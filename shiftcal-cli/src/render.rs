//! Terminal rendering for shiftcal-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.
//! Times are rendered in the local timezone.

use chrono::{Datelike, Local};
use owo_colors::OwoColorize;
use shiftcal_core::event::{CalendarEvent, EventSource};
use shiftcal_core::feeds::{FeedOutcome, FeedStatus};
use shiftcal_core::shift::{Shift, ShiftType};
use shiftcal_core::view::{CalendarView, DayCell, Layout};
use shiftcal_core::weather::{Conditions, WeatherReport};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Width of one month grid column, e.g. " 29M•"
const CELL_WIDTH: usize = 5;

const WEEKDAY_HEADER: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

impl Render for ShiftType {
    fn render(&self) -> String {
        let symbol = self.symbol().to_string();
        match self {
            ShiftType::Morning => symbol.yellow().to_string(),
            ShiftType::Afternoon => symbol.blue().to_string(),
            ShiftType::RestDay => symbol.green().to_string(),
        }
    }
}

impl Render for Shift {
    fn render(&self) -> String {
        let label = match self.shift_type {
            ShiftType::Morning => self.shift_type.label().yellow().to_string(),
            ShiftType::Afternoon => self.shift_type.label().blue().to_string(),
            ShiftType::RestDay => self.shift_type.label().green().to_string(),
        };
        format!("{} {}", label, self.time_span().dimmed())
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let time = format!("{:>7}", self.render_start_time(&Local));
        let mut line = format!("{} {}", time.dimmed(), self.title);
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        if let EventSource::Feed(url) = &self.source {
            line.push_str(&format!(" {}", format!("[{}]", feed_label(url)).dimmed()));
        }
        line
    }
}

impl Render for FeedOutcome {
    fn render(&self) -> String {
        match &self.status {
            FeedStatus::Loaded(count) => {
                format!("{} {} {}", "✓".green(), self.url, format!("({count} events)").dimmed())
            }
            FeedStatus::Failed(reason) => format!("{} {} {}", "✗".red(), self.url, reason.dimmed()),
        }
    }
}

impl Render for Conditions {
    fn render(&self) -> String {
        let mut parts = vec![format!("{:.0}°", self.temperature).bold().to_string()];
        if !self.summary.is_empty() {
            parts.push(self.summary.clone());
        }
        if let Some(feels_like) = self.feels_like {
            parts.push(format!("feels {feels_like:.0}°").dimmed().to_string());
        }
        if let Some(humidity) = self.humidity {
            parts.push(format!("{humidity}%").dimmed().to_string());
        }
        if let Some(wind) = self.wind_speed {
            parts.push(format!("wind {wind:.1}").dimmed().to_string());
        }
        parts.join(" ")
    }
}

impl Render for WeatherReport {
    fn render(&self) -> String {
        let mut lines = Vec::new();
        let heading = match &self.location {
            Some(location) => format!("Weather in {location}"),
            None => "Weather".to_string(),
        };
        lines.push(heading.bold().to_string());
        lines.push(format!("  Now        {}", self.current.render()));

        for day in &self.daily {
            let label = day.date.format("%a %-d %b").to_string();
            lines.push(format!("  {:<10} {}", label, day.conditions.render()));
        }

        lines.join("\n")
    }
}

impl Render for CalendarView<'_> {
    fn render(&self) -> String {
        let mut lines = vec![self.title().bold().to_string(), String::new()];

        match &self.layout {
            Layout::Month { weeks, .. } => {
                let header: String = WEEKDAY_HEADER.iter().map(|d| format!("{d:>4} ")).collect();
                lines.push(header.dimmed().to_string());
                for week in weeks {
                    let row: String = week
                        .iter()
                        .map(|slot| match slot {
                            Some(cell) => render_month_cell(cell),
                            None => " ".repeat(CELL_WIDTH),
                        })
                        .collect();
                    lines.push(row.trim_end().to_string());
                }
                lines.push(String::new());
                lines.push(render_legend());
            }
            Layout::Week { days } => {
                for (index, cell) in days.iter().enumerate() {
                    if index > 0 {
                        lines.push(String::new());
                    }
                    lines.extend(render_day_block(cell));
                }
            }
            Layout::Day { cell, all_day, hours } => {
                if let Some(shift) = cell.shift {
                    lines.push(format!("  {}", shift.render()));
                }
                for event in all_day {
                    lines.push(format!("  {}", event.render()));
                }
                for slot in hours {
                    let label = format!("{:02}:00", slot.hour);
                    if slot.events.is_empty() {
                        lines.push(format!("  {}", label.dimmed()));
                        continue;
                    }
                    let titles: Vec<String> = slot.events.iter().map(|e| e.title.clone()).collect();
                    lines.push(format!("  {} {}", label, titles.join(", ")));
                }
            }
        }

        lines.join("\n")
    }
}

fn render_month_cell(cell: &DayCell) -> String {
    let day = format!("{:>3}", cell.date.day());
    let day = if cell.is_today {
        day.reversed().bold().to_string()
    } else {
        day
    };
    let shift = cell.shift.map(|s| s.shift_type.render()).unwrap_or_else(|| " ".to_string());
    let marker = if cell.events.is_empty() {
        " ".to_string()
    } else {
        "•".cyan().to_string()
    };
    format!("{day}{shift}{marker}")
}

fn render_day_block(cell: &DayCell) -> Vec<String> {
    let label = cell.date.format("%a %-d %b").to_string();
    let heading = if cell.is_today {
        format!("{} {}", label.bold(), "(today)".dimmed())
    } else {
        label.bold().to_string()
    };

    let mut lines = vec![heading];
    if let Some(shift) = cell.shift {
        lines.push(format!("  {}", shift.render()));
    }
    for event in &cell.events {
        lines.push(format!("  {}", event.render()));
    }
    if cell.shift.is_none() && cell.events.is_empty() {
        lines.push(format!("  {}", "Nothing planned".dimmed()));
    }
    lines
}

fn render_legend() -> String {
    let entries: Vec<String> = ShiftType::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.render(), kind.label()))
        .collect();
    format!("{}  {} {}", entries.join("  "), "•".cyan(), "events")
}

/// Host of a feed URL, for compact tags.
fn feed_label(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_feed_label_strips_scheme_and_path() {
        assert_eq!(feed_label("https://example.com/cal.ics"), "example.com");
        assert_eq!(feed_label("webcal://cal.example.org"), "cal.example.org");
        assert_eq!(feed_label("not a url"), "not a url");
    }

    #[test]
    fn test_event_render_tags_feed_source() {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        let event = CalendarEvent {
            id: "1".into(),
            title: "Standup".into(),
            start,
            end: start,
            all_day: true,
            source: EventSource::Feed("https://example.com/team.ics".into()),
            description: None,
            location: Some("Room 4".into()),
        };

        let rendered = event.render();
        assert!(rendered.contains("all-day"));
        assert!(rendered.contains("Standup"));
        assert!(rendered.contains("Room 4"));
        assert!(rendered.contains("example.com"));
    }

    #[test]
    fn test_month_cell_shows_shift_symbol() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let shift = Shift::with_default_times(date, ShiftType::Afternoon);
        let cell = DayCell {
            date,
            is_today: false,
            shift: Some(&shift),
            events: Vec::new(),
        };

        let rendered = render_month_cell(&cell);
        assert!(rendered.contains("  5"));
        assert!(rendered.contains('A'));
    }
}
