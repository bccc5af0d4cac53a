//! Core library for shiftcal, a personal shift calendar.
//!
//! - `grid` and `date_range`: the calendar date engine (month/week/day layout,
//!   navigation, visible ranges)
//! - `shift_store`, `event_store`, `feed_store`: persisted state over a
//!   key-value [`storage::Storage`]
//! - `ics` and `feeds`: iCal feed parsing and concurrent refresh
//! - `weather`: current conditions and a daily forecast
//! - `view`: cells joined with the shifts and events they display

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod event_store;
pub mod feed_store;
pub mod feeds;
pub mod grid;
pub mod ics;
pub mod shift;
pub mod shift_store;
pub mod storage;
pub mod view;
pub mod weather;

pub use error::{ShiftCalError, ShiftCalResult};
pub use grid::{Direction, ViewMode};
