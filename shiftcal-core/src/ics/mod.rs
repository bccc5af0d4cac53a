//! ICS feed parsing.
//!
//! Reads VEVENT components according to RFC 5545. Recurrence rules are not
//! expanded; each VEVENT yields one event at its DTSTART.

mod parse;

pub use parse::parse_feed;
