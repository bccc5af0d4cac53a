//! Calendar date engine.
//!
//! Pure functions that lay out the month, week and day views. Weeks start on
//! Monday. Nothing here fails: inputs outside chrono's representable range
//! degrade to an empty grid or leave the reference date unchanged.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_WEEK, HOURS_PER_DAY};

/// One row of a month grid. `None` is padding before day 1 or after the last day.
pub type Week = [Option<NaiveDate>; DAYS_PER_WEEK];

/// Calendar view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewMode {
    pub fn as_key(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "month" => Some(ViewMode::Month),
            "week" => Some(ViewMode::Week),
            "day" => Some(ViewMode::Day),
            _ => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::from_key(s).ok_or_else(|| format!("Unknown view '{}'. Expected month, week or day", s))
    }
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    /// Maps -1 / +1 to a direction. Any other value has no direction.
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            -1 => Some(Direction::Back),
            1 => Some(Direction::Forward),
            _ => None,
        }
    }

    pub fn sign(&self) -> i32 {
        match self {
            Direction::Back => -1,
            Direction::Forward => 1,
        }
    }
}

/// Month layout: the normalized year/month and its week rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    /// 1-based month after normalization
    pub month: u32,
    pub weeks: Vec<Week>,
}

impl MonthGrid {
    /// All real dates in grid order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flat_map(|week| week.iter().flatten().copied())
    }
}

/// Hour buckets of a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBounds {
    pub date: NaiveDate,
    pub hours: Range<u32>,
}

/// Builds the month grid for `month_index` (0 = January) of `year`.
///
/// Out-of-range indexes carry into adjacent years: `(2024, 12)` is January
/// 2025 and `(2024, -1)` is December 2023.
pub fn month_grid(year: i32, month_index: i32) -> MonthGrid {
    let total = i64::from(year) * 12 + i64::from(month_index);
    let norm_year = total.div_euclid(12);
    let norm_month = (total.rem_euclid(12) + 1) as u32;

    let first = i32::try_from(norm_year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, norm_month, 1));

    let Some(first) = first else {
        return MonthGrid {
            year: norm_year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            month: norm_month,
            weeks: Vec::new(),
        };
    };

    let mut weeks = Vec::new();
    let mut week: Week = [None; DAYS_PER_WEEK];
    // Sunday lands on slot 6, every other weekday on weekday - 1
    let mut slot = first.weekday().num_days_from_monday() as usize;

    for day in first.iter_days().take_while(|d| d.month() == first.month()) {
        week[slot] = Some(day);
        slot += 1;
        if slot == DAYS_PER_WEEK {
            weeks.push(week);
            week = [None; DAYS_PER_WEEK];
            slot = 0;
        }
    }

    if slot > 0 {
        weeks.push(week);
    }

    MonthGrid {
        year: first.year(),
        month: first.month(),
        weeks,
    }
}

/// Month grid for the month containing `date`.
pub fn month_grid_for(date: NaiveDate) -> MonthGrid {
    month_grid(date.year(), date.month0() as i32)
}

/// Monday of the week containing `reference`.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    let weekday = reference.weekday().num_days_from_sunday();
    let back = u64::from((weekday + 6) % 7);
    reference.checked_sub_days(Days::new(back)).unwrap_or(reference)
}

/// The seven dates Monday..Sunday of the week containing `reference`.
pub fn week_dates(reference: NaiveDate) -> [NaiveDate; DAYS_PER_WEEK] {
    let monday = week_start(reference);
    std::array::from_fn(|i| {
        monday
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(NaiveDate::MAX)
    })
}

pub fn day_bounds(reference: NaiveDate) -> DayBounds {
    DayBounds {
        date: reference,
        hours: 0..HOURS_PER_DAY as u32,
    }
}

/// Moves `reference` one view step in `direction`.
///
/// Month steps clamp the day to the target month's length, so Jan 31 moves
/// to Feb 28 (or 29).
pub fn advance(reference: NaiveDate, mode: ViewMode, direction: Direction) -> NaiveDate {
    let moved = match (mode, direction) {
        (ViewMode::Month, Direction::Forward) => reference.checked_add_months(Months::new(1)),
        (ViewMode::Month, Direction::Back) => reference.checked_sub_months(Months::new(1)),
        (ViewMode::Week, Direction::Forward) => reference.checked_add_days(Days::new(7)),
        (ViewMode::Week, Direction::Back) => reference.checked_sub_days(Days::new(7)),
        (ViewMode::Day, Direction::Forward) => reference.checked_add_days(Days::new(1)),
        (ViewMode::Day, Direction::Back) => reference.checked_sub_days(Days::new(1)),
    };
    moved.unwrap_or(reference)
}

/// Moves `reference` by `steps` views in one jump, backwards for negative
/// counts. Month jumps clamp the day once, against the target month only.
pub fn advance_by(reference: NaiveDate, mode: ViewMode, steps: i32) -> NaiveDate {
    let count = steps.unsigned_abs();
    let moved = match (mode, steps < 0) {
        (ViewMode::Month, false) => reference.checked_add_months(Months::new(count)),
        (ViewMode::Month, true) => reference.checked_sub_months(Months::new(count)),
        (ViewMode::Week, false) => reference.checked_add_days(Days::new(u64::from(count) * 7)),
        (ViewMode::Week, true) => reference.checked_sub_days(Days::new(u64::from(count) * 7)),
        (ViewMode::Day, false) => reference.checked_add_days(Days::new(u64::from(count))),
        (ViewMode::Day, true) => reference.checked_sub_days(Days::new(u64::from(count))),
    };
    moved.unwrap_or(reference)
}

/// Compares year, month and day-of-month only.
pub fn is_same_day(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}
