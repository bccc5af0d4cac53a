pub mod config;
pub mod event;
pub mod feed;
pub mod shift;
pub mod show;
pub mod weather;

use anyhow::Result;
use shiftcal_core::config::ShiftcalConfig;
use shiftcal_core::event_store::EventStore;
use shiftcal_core::feed_store::FeedStore;
use shiftcal_core::shift_store::ShiftStore;
use shiftcal_core::storage::FileStorage;

/// Loaded config plus the three stores every command works against.
pub struct Session {
    pub config: ShiftcalConfig,
    pub shifts: ShiftStore<FileStorage>,
    pub events: EventStore<FileStorage>,
    pub feeds: FeedStore<FileStorage>,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = ShiftcalConfig::load()?;
        let storage = config.storage();
        tracing::debug!(data_dir = %storage.dir().display(), "opening stores");

        Ok(Session {
            shifts: ShiftStore::open(storage.clone()),
            events: EventStore::open(storage.clone()),
            feeds: FeedStore::open(storage),
            config,
        })
    }

    /// Flush every store.
    pub fn close(self) -> Result<()> {
        self.shifts.close()?;
        self.events.close()?;
        self.feeds.close()?;
        Ok(())
    }
}
