//! Concurrent map store implementation.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Utc;
use crossbeam_channel::{Sender, bounded};
use httpcache_core::{Fingerprint, PutStatus, Raw, Store};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use crate::builder::MemoryStoreBuilder;
use crate::config::MemoryStoreConfig;
use crate::metadata::{self, ItemMetadata, MetadataEvent, MetadataMap};
use crate::scheduler;

/// In-memory store backed by a lock-protected map.
///
/// Reads take a shared lock and may run concurrently; `put` and `delete` take
/// the exclusive lock. Each operation also enqueues an event for the metadata
/// worker, which owns the usage statistics exposed by
/// [`metadata`](Self::metadata). Enqueueing blocks only while the bounded
/// mailbox is full; events are never dropped.
///
/// # Lifecycle
///
/// Building the store spawns two threads: the metadata worker and the
/// idle-tick scheduler. [`close`](Self::close) stops both, waits for them to
/// exit and then clears all entries. It is idempotent and also runs on drop.
/// A closed store misses on `get` and rejects every `put`.
///
/// # Caveats
///
/// - No eviction: entries stay until deleted, replaced or the store closes.
/// - Entries are bounded only individually, by `max_item_size`.
pub struct MemoryStore {
    items: RwLock<HashMap<Fingerprint, Raw>>,
    metadata: MetadataMap,
    mailbox: RwLock<Option<Sender<MetadataEvent>>>,
    shutdown: Mutex<Option<Sender<()>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    max_item_size: usize,
}

impl MemoryStore {
    /// Creates a store with the given size ceiling and default settings.
    pub fn new(max_item_size: usize) -> io::Result<Self> {
        Self::builder().max_item_size(max_item_size).build()
    }

    /// Creates a new builder for `MemoryStore`.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    /// Creates a store from a deserialized configuration.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] for a zero `tick_interval`.
    pub fn from_config(config: MemoryStoreConfig) -> io::Result<Self> {
        Self::start(config)
    }

    pub(crate) fn start(config: MemoryStoreConfig) -> io::Result<Self> {
        if config.tick_interval.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "tick_interval must be greater than zero",
            ));
        }
        let metadata: MetadataMap = Arc::new(RwLock::new(HashMap::new()));
        let (events_tx, events_rx) = bounded(config.mailbox_capacity);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let mut workers = Vec::with_capacity(2);
        workers.push(
            thread::Builder::new()
                .name("httpcache-metadata".into())
                .spawn({
                    let metadata = Arc::clone(&metadata);
                    move || metadata::run_worker(events_rx, metadata)
                })?,
        );
        let scheduler = thread::Builder::new()
            .name("httpcache-scheduler".into())
            .spawn({
                let metadata = Arc::clone(&metadata);
                let interval = config.tick_interval;
                let max_idle_time = config.max_idle_time;
                move || scheduler::run_worker(shutdown_rx, interval, max_idle_time, metadata)
            });
        match scheduler {
            Ok(handle) => workers.push(handle),
            Err(error) => {
                // Dropping the mailbox sender stops the metadata worker.
                drop(events_tx);
                for worker in workers {
                    let _ = worker.join();
                }
                return Err(error);
            }
        }

        let store = Self {
            items: RwLock::new(HashMap::new()),
            metadata,
            mailbox: RwLock::new(Some(events_tx)),
            shutdown: Mutex::new(Some(shutdown_tx)),
            workers: Mutex::new(workers),
            max_item_size: config.max_item_size,
        };
        store.notify(MetadataEvent::Initialize);
        info!(max_item_size = store.max_item_size, "memory store started");
        Ok(store)
    }

    /// Returns `true` if an entry of `len` bytes fits under the size ceiling.
    pub fn will_accept(&self, len: usize) -> bool {
        len < self.max_item_size
    }

    /// Size ceiling of a single entry.
    pub fn max_item_size(&self) -> usize {
        self.max_item_size
    }

    /// Number of stored entries.
    ///
    /// Advisory only: the value may be outdated by the time it is used.
    pub fn size(&self) -> usize {
        self.items.read().len()
    }

    /// Snapshot of the usage statistics of `key`.
    ///
    /// Statistics are updated asynchronously and may lag behind the
    /// operations that produced them.
    pub fn metadata(&self, key: &Fingerprint) -> Option<ItemMetadata> {
        self.metadata.read().get(key).cloned()
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.mailbox.read().is_none()
    }

    /// Stops both workers and clears all entries.
    ///
    /// Blocks until the metadata worker has drained its mailbox and the
    /// scheduler has exited. Calling it again is a no-op.
    pub fn close(&self) {
        let mailbox = self.mailbox.write().take();
        let shutdown = self.shutdown.lock().take();
        if mailbox.is_none() && shutdown.is_none() {
            return;
        }
        drop(mailbox);
        drop(shutdown);

        for worker in self.workers.lock().drain(..) {
            if worker.join().is_err() {
                warn!("store worker panicked");
            }
        }
        self.items.write().clear();
        info!("memory store closed");
    }

    fn notify(&self, event: MetadataEvent) {
        if let Some(mailbox) = self.mailbox.read().as_ref()
            && mailbox.send(event).is_err()
        {
            trace!("metadata worker is gone, event dropped");
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &Fingerprint) -> Option<Raw> {
        let value = self.items.read().get(key).cloned();
        self.notify(MetadataEvent::Get {
            key: key.clone(),
            at: Utc::now(),
        });
        value
    }

    fn put(&self, key: &Fingerprint, entry: Raw) -> PutStatus {
        if !self.will_accept(entry.len()) {
            debug!(
                %key,
                bytes = entry.len(),
                max_item_size = self.max_item_size,
                "entry rejected: too large"
            );
            return PutStatus::Rejected;
        }

        let mut items = self.items.write();
        let mailbox = self.mailbox.read();
        let Some(mailbox) = mailbox.as_ref() else {
            debug!(%key, "entry rejected: store closed");
            return PutStatus::Rejected;
        };
        items.insert(key.clone(), entry);
        if mailbox
            .send(MetadataEvent::Put {
                key: key.clone(),
                at: Utc::now(),
            })
            .is_err()
        {
            trace!("metadata worker is gone, event dropped");
        }
        PutStatus::Accepted
    }

    fn delete(&self, key: &Fingerprint) {
        let mut items = self.items.write();
        items.remove(key);
        self.notify(MetadataEvent::Delete { key: key.clone() });
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("size", &self.size())
            .field("max_item_size", &self.max_item_size)
            .field("closed", &self.is_closed())
            .finish()
    }
}
