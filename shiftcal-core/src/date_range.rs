//! Half-open date ranges used to select visible shifts and events.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{ShiftCalError, ShiftCalResult};
use crate::grid::{ViewMode, week_start};

/// `[start, end)` in calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Range covered by `mode` around `reference`:
    /// the whole month, the Monday-based week, or the single day.
    pub fn for_view(reference: NaiveDate, mode: ViewMode) -> Self {
        let start = match mode {
            ViewMode::Month => reference.with_day(1).unwrap_or(reference),
            ViewMode::Week => week_start(reference),
            ViewMode::Day => reference,
        };

        let end = match mode {
            ViewMode::Month => start.checked_add_months(Months::new(1)),
            ViewMode::Week => start.checked_add_days(Days::new(7)),
            ViewMode::Day => start.checked_add_days(Days::new(1)),
        }
        .unwrap_or(NaiveDate::MAX);

        DateRange { start, end }
    }

    /// Parse optional YYYY-MM-DD bounds; `to` is inclusive on input.
    /// Missing bounds default to the month containing `today`.
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> ShiftCalResult<Self> {
        let month = DateRange::for_view(today, ViewMode::Month);

        let start = match from {
            Some(s) => parse_date(s)?,
            None => month.start,
        };

        let end = match to {
            Some(s) => {
                let last = parse_date(s)?;
                if last < start {
                    return Err(ShiftCalError::Validation(format!(
                        "Range end {} is before start {}",
                        last, start
                    )));
                }
                last.succ_opt().unwrap_or(NaiveDate::MAX)
            }
            None => month.end,
        };

        if end < start {
            return Err(ShiftCalError::Validation(format!(
                "Range start {} is after the end of the current month",
                start
            )));
        }

        Ok(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|d| *d < self.end)
    }
}

/// Parse a YYYY-MM-DD date.
pub fn parse_date(s: &str) -> ShiftCalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        ShiftCalError::Validation(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}
