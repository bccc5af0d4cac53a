//! Shift types and per-date shift records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ShiftCalError, ShiftCalResult};

/// Kind of work period assigned to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Afternoon,
    RestDay,
}

impl ShiftType {
    pub const ALL: [ShiftType; 3] = [ShiftType::Morning, ShiftType::Afternoon, ShiftType::RestDay];

    /// Default (start, end) as HH:MM. Rest days have no times.
    pub fn default_times(&self) -> (&'static str, &'static str) {
        match self {
            ShiftType::Morning => ("06:00", "14:00"),
            ShiftType::Afternoon => ("14:00", "22:00"),
            ShiftType::RestDay => ("", ""),
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            ShiftType::Morning => "morning",
            ShiftType::Afternoon => "afternoon",
            ShiftType::RestDay => "rest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftType::Morning => "Morning",
            ShiftType::Afternoon => "Afternoon",
            ShiftType::RestDay => "Rest day",
        }
    }

    /// Single-letter marker used in compact grids.
    pub fn symbol(&self) -> char {
        match self {
            ShiftType::Morning => 'M',
            ShiftType::Afternoon => 'A',
            ShiftType::RestDay => 'R',
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShiftType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" | "m" => Ok(ShiftType::Morning),
            "afternoon" | "a" => Ok(ShiftType::Afternoon),
            "rest" | "rest_day" | "restday" | "r" => Ok(ShiftType::RestDay),
            _ => Err(format!("Unknown shift type '{}'. Expected morning, afternoon or rest", s)),
        }
    }
}

/// A shift assigned to one calendar date. The date is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub start_time: String,
    pub end_time: String,
}

impl Shift {
    /// Shift with explicit times. Times must be HH:MM; rest days may leave them empty.
    pub fn new(
        date: NaiveDate,
        shift_type: ShiftType,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> ShiftCalResult<Self> {
        let shift = Shift {
            date,
            shift_type,
            start_time: start_time.into(),
            end_time: end_time.into(),
        };
        shift.validate()?;
        Ok(shift)
    }

    /// Shift using the type's default times.
    pub fn with_default_times(date: NaiveDate, shift_type: ShiftType) -> Self {
        let (start, end) = shift_type.default_times();
        Shift {
            date,
            shift_type,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    pub fn validate(&self) -> ShiftCalResult<()> {
        for (field, value) in [("start", &self.start_time), ("end", &self.end_time)] {
            if value.is_empty() && self.shift_type == ShiftType::RestDay {
                continue;
            }
            if !is_hh_mm(value) {
                return Err(ShiftCalError::Validation(format!(
                    "Invalid {} time '{}'. Expected HH:MM",
                    field, value
                )));
            }
        }
        Ok(())
    }

    /// "06:00–14:00", or "all day" when the shift has no times.
    pub fn time_span(&self) -> String {
        if self.start_time.is_empty() && self.end_time.is_empty() {
            "all day".to_string()
        } else {
            format!("{}–{}", self.start_time, self.end_time)
        }
    }
}

/// Format check only: two digits, a colon, two digits.
fn is_hh_mm(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_times() {
        let shift = Shift::with_default_times(date(2024, 2, 1), ShiftType::Morning);
        assert_eq!(shift.start_time, "06:00");
        assert_eq!(shift.end_time, "14:00");

        let rest = Shift::with_default_times(date(2024, 2, 1), ShiftType::RestDay);
        assert_eq!(rest.time_span(), "all day");
    }

    #[test]
    fn test_time_format_is_checked() {
        assert!(Shift::new(date(2024, 2, 1), ShiftType::Afternoon, "14:00", "22:30").is_ok());
        assert!(Shift::new(date(2024, 2, 1), ShiftType::Afternoon, "2pm", "22:30").is_err());
        assert!(Shift::new(date(2024, 2, 1), ShiftType::Morning, "", "14:00").is_err());
        assert!(Shift::new(date(2024, 2, 1), ShiftType::RestDay, "", "").is_ok());
    }

    #[test]
    fn test_format_check_does_not_validate_clock_range() {
        assert!(Shift::new(date(2024, 2, 1), ShiftType::Morning, "25:00", "99:99").is_ok());
    }

    #[test]
    fn test_json_shape() {
        let shift = Shift::with_default_times(date(2024, 2, 1), ShiftType::RestDay);
        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-02-01",
                "type": "rest_day",
                "startTime": "",
                "endTime": ""
            })
        );
    }

    #[test]
    fn test_parse_shift_type() {
        assert_eq!("Morning".parse::<ShiftType>(), Ok(ShiftType::Morning));
        assert_eq!("rest".parse::<ShiftType>(), Ok(ShiftType::RestDay));
        assert!("night".parse::<ShiftType>().is_err());
    }
}
