//! Persisted manually entered events.

use crate::constants::EVENTS_KEY;
use crate::error::ShiftCalResult;
use crate::event::{CalendarEvent, NewEvent};
use crate::storage::{Storage, load_json, save_json};

pub struct EventStore<S: Storage> {
    storage: S,
    events: Vec<CalendarEvent>,
    dirty: bool,
}

impl<S: Storage> EventStore<S> {
    pub fn open(storage: S) -> Self {
        let events = load_json(&storage, EVENTS_KEY);
        EventStore {
            storage,
            events,
            dirty: false,
        }
    }

    /// Validates `input`, stores it and returns the created event.
    pub fn add(&mut self, input: NewEvent) -> ShiftCalResult<&CalendarEvent> {
        let event = input.into_event()?;
        tracing::debug!(id = %event.id, title = %event.title, "adding local event");
        self.events.push(event);
        self.dirty = true;
        self.flush()?;
        let index = self.events.len() - 1;
        Ok(&self.events[index])
    }

    /// Removes the event with `id`. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> ShiftCalResult<bool> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Ok(false);
        }
        self.dirty = true;
        self.flush()?;
        Ok(true)
    }

    pub fn all(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn flush(&mut self) -> ShiftCalResult<()> {
        save_json(&mut self.storage, EVENTS_KEY, &self.events)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventSource;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone, Utc};

    fn input(title: &str) -> NewEvent {
        let start = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        NewEvent {
            title: title.into(),
            start,
            end: start + Duration::hours(1),
            all_day: false,
            description: None,
            location: None,
        }
    }

    #[test]
    fn test_add_and_reopen() {
        let mut store = EventStore::open(MemoryStorage::new());
        let id = store.add(input("Dentist")).unwrap().id.clone();

        let reopened = EventStore::open(store.close().unwrap());
        assert_eq!(reopened.all().len(), 1);
        assert_eq!(reopened.all()[0].id, id);
        assert_eq!(reopened.all()[0].source, EventSource::Local);
    }

    #[test]
    fn test_invalid_input_blocks_save() {
        let mut store = EventStore::open(MemoryStorage::new());
        assert!(store.add(input("")).is_err());
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut store = EventStore::open(MemoryStorage::new());
        let id = store.add(input("Dentist")).unwrap().id.clone();

        assert!(!store.remove("missing").unwrap());
        assert!(store.remove(&id).unwrap());
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_close_without_changes_keeps_stored_value() {
        let mut storage = MemoryStorage::new();
        storage.set_item(EVENTS_KEY, "not json").unwrap();

        let store = EventStore::open(storage);
        assert!(store.all().is_empty());
        let storage = store.close().unwrap();

        assert_eq!(storage.get_item(EVENTS_KEY).unwrap().as_deref(), Some("not json"));
    }
}
