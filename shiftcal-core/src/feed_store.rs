//! Persisted list of iCal feed URLs.

use url::Url;

use crate::constants::ICAL_URLS_KEY;
use crate::error::{ShiftCalError, ShiftCalResult};
use crate::storage::{Storage, load_json, save_json};

const FEED_SCHEMES: [&str; 4] = ["http", "https", "webcal", "webcals"];

pub struct FeedStore<S: Storage> {
    storage: S,
    urls: Vec<String>,
    dirty: bool,
}

impl<S: Storage> FeedStore<S> {
    pub fn open(storage: S) -> Self {
        let urls = load_json(&storage, ICAL_URLS_KEY);
        FeedStore {
            storage,
            urls,
            dirty: false,
        }
    }

    /// Adds a feed URL. Returns false when it is already subscribed.
    pub fn add(&mut self, url: &str) -> ShiftCalResult<bool> {
        let url = validate_feed_url(url)?;
        if self.urls.contains(&url) {
            return Ok(false);
        }
        self.urls.push(url);
        self.dirty = true;
        self.flush()?;
        Ok(true)
    }

    /// Removes a feed URL. Returns whether it was subscribed.
    pub fn remove(&mut self, url: &str) -> ShiftCalResult<bool> {
        let url = url.trim();
        let before = self.urls.len();
        self.urls.retain(|u| u != url);
        if self.urls.len() == before {
            return Ok(false);
        }
        self.dirty = true;
        self.flush()?;
        Ok(true)
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn flush(&mut self) -> ShiftCalResult<()> {
        save_json(&mut self.storage, ICAL_URLS_KEY, &self.urls)?;
        self.dirty = false;
        Ok(())
    }

    /// Writes pending changes, if any, and hands the storage back. A store
    /// that was only read leaves the stored value untouched.
    pub fn close(mut self) -> ShiftCalResult<S> {
        if self.dirty {
            self.flush()?;
        }
        Ok(self.storage)
    }
}

/// Checks that `raw` is an absolute http(s) or webcal(s) URL with a host.
pub fn validate_feed_url(raw: &str) -> ShiftCalResult<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| ShiftCalError::Validation(format!("Invalid feed URL '{}': {}", trimmed, e)))?;

    if !FEED_SCHEMES.contains(&parsed.scheme()) {
        return Err(ShiftCalError::Validation(format!(
            "Unsupported feed URL scheme '{}'. Expected http, https or webcal",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ShiftCalError::Validation(format!("Feed URL '{}' has no host", trimmed)));
    }

    Ok(trimmed.to_string())
}
