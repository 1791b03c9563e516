//! Serializable store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default size ceiling of a single entry: 50 KiB.
pub const DEFAULT_MAX_ITEM_SIZE: usize = 50 * 1024;
/// Default idle-tick interval.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
/// Default capacity of the metadata mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 5;

/// Configuration of a [`MemoryStore`](crate::MemoryStore).
///
/// Durations use human-readable strings (`"500ms"`, `"10m"`).
///
/// ```yaml
/// max_item_size: 102400
/// max_idle_time: 10m
/// tick_interval: 1s
/// mailbox_capacity: 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
    /// Entries whose length is at or above this many bytes are rejected.
    pub max_item_size: usize,
    /// Idle time after which an entry would be eligible for eviction.
    ///
    /// Eviction is not implemented: the value is only reported on idle ticks.
    #[serde(with = "humantime_serde")]
    pub max_idle_time: Option<Duration>,
    /// Interval between idle ticks of the scheduler worker.
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Bound of the metadata mailbox. Producers block while it is full.
    pub mailbox_capacity: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_item_size: DEFAULT_MAX_ITEM_SIZE,
            max_idle_time: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}
