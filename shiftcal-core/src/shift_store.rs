//! Persisted shift collection: at most one shift per date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::constants::SHIFTS_KEY;
use crate::date_range::DateRange;
use crate::error::ShiftCalResult;
use crate::shift::Shift;
use crate::storage::{Storage, load_json, save_json};

/// Shift collection backed by a [`Storage`].
///
/// Lifecycle: [`ShiftStore::open`] loads, `save`/`delete` write the whole
/// collection, [`ShiftStore::close`] flushes unsaved changes and hands the
/// storage back.
pub struct ShiftStore<S: Storage> {
    storage: S,
    shifts: BTreeMap<NaiveDate, Shift>,
    dirty: bool,
}

impl<S: Storage> ShiftStore<S> {
    pub fn open(storage: S) -> Self {
        let shifts = load_json(&storage, SHIFTS_KEY);
        ShiftStore {
            storage,
            shifts,
            dirty: false,
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Shift> {
        self.shifts.get(&date)
    }

    /// Inserts or replaces the shift for its date.
    pub fn save(&mut self, shift: Shift) -> ShiftCalResult<()> {
        shift.validate()?;
        tracing::debug!(date = %shift.date, kind = shift.shift_type.as_key(), "saving shift");
        self.shifts.insert(shift.date, shift);
        self.dirty = true;
        self.flush()
    }

    /// Removes the shift for `date`. Returns whether one existed; deleting a
    /// missing date writes nothing.
    pub fn delete(&mut self, date: NaiveDate) -> ShiftCalResult<bool> {
        if self.shifts.remove(&date).is_none() {
            return Ok(false);
        }
        tracing::debug!(%date, "deleted shift");
        self.dirty = true;
        self.flush()?;
        Ok(true)
    }

    pub fn all(&self) -> &BTreeMap<NaiveDate, Shift> {
        &self.shifts
    }

    pub fn in_range(&self, range: &DateRange) -> impl Iterator<Item = &Shift> {
        self.shifts.range(range.start..range.end).map(|(_, shift)| shift)
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn flush(&mut self) -> ShiftCalResult<()> {
        save_json(&mut self.storage, SHIFTS_KEY, &self.shifts)?;
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
