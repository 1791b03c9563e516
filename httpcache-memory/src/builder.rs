//! Builder for configuring [`MemoryStore`].

use std::io;
use std::time::Duration;

use crate::config::MemoryStoreConfig;
use crate::store::MemoryStore;

/// Builder for creating and configuring a [`MemoryStore`].
///
/// Use [`MemoryStore::builder`] to create a new builder instance.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use httpcache_memory::MemoryStore;
///
/// let store = MemoryStore::builder()
///     .max_item_size(1024 * 1024)
///     .max_idle_time(Duration::from_secs(600))
///     .tick_interval(Duration::from_secs(1))
///     .build()
///     .unwrap();
/// # store.close();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreBuilder {
    config: MemoryStoreConfig,
}

impl MemoryStoreBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: MemoryStoreConfig) -> Self {
        Self { config }
    }

    /// Sets the size ceiling of a single entry.
    ///
    /// Entries of `max_item_size` bytes or more are rejected.
    ///
    /// # Default
    ///
    /// 50 KiB
    pub fn max_item_size(mut self, bytes: usize) -> Self {
        self.config.max_item_size = bytes;
        self
    }

    /// Sets the idle time after which entries would be eligible for eviction.
    ///
    /// Eviction is not implemented; the setting only affects idle-tick logs.
    pub fn max_idle_time(mut self, idle: Duration) -> Self {
        self.config.max_idle_time = Some(idle);
        self
    }

    /// Sets the interval of the idle-tick scheduler. Must be non-zero.
    ///
    /// # Default
    ///
    /// 500 ms
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.config.tick_interval = interval;
        self
    }

    /// Sets the bound of the metadata mailbox.
    ///
    /// # Default
    ///
    /// 5
    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.config.mailbox_capacity = capacity;
        self
    }

    /// Builds the store and starts its two workers.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] for a zero tick interval,
    /// or if a worker thread cannot be spawned.
    pub fn build(self) -> io::Result<MemoryStore> {
        MemoryStore::start(self.config)
    }
}
