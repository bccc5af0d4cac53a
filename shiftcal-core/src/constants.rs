//! Shared constants.

/// Storage key for the shift collection.
pub const SHIFTS_KEY: &str = "shifts";

/// Storage key for the iCal feed URL list.
pub const ICAL_URLS_KEY: &str = "ical_urls";

/// Storage key for manually entered events.
pub const EVENTS_KEY: &str = "events";

/// Default timeout for a single feed or weather request.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Number of forecast days shown by default.
pub const DEFAULT_FORECAST_DAYS: usize = 5;

pub const DAYS_PER_WEEK: usize = 7;

pub const HOURS_PER_DAY: usize = 24;
