//! Per-key usage metadata and the worker that owns it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use httpcache_core::Fingerprint;
use parking_lot::RwLock;
use tracing::{debug, trace};

pub(crate) type MetadataMap = Arc<RwLock<HashMap<Fingerprint, ItemMetadata>>>;

/// Usage statistics of a stored entry.
///
/// Maintained by the metadata worker only; everything else sees snapshots.
/// No cache decision consumes these values yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    /// Number of `get` calls observed after the entry was first stored.
    pub access_count: u64,
    /// Number of times the entry was replaced; `0` for the first `put`.
    pub version: u64,
    /// Time of the most recent `get`, if any.
    pub last_access: Option<DateTime<Utc>>,
    /// Time of the most recent `put`.
    pub last_update: DateTime<Utc>,
    /// Time of the first `put`.
    pub created: DateTime<Utc>,
}

impl ItemMetadata {
    fn new(at: DateTime<Utc>) -> Self {
        Self {
            access_count: 0,
            version: 0,
            last_access: None,
            last_update: at,
            created: at,
        }
    }

    /// Most recent access or update.
    pub fn last_used(&self) -> DateTime<Utc> {
        self.last_access
            .map_or(self.last_update, |access| access.max(self.last_update))
    }
}

/// Mailbox message sent by store operations.
#[derive(Debug)]
pub(crate) enum MetadataEvent {
    Initialize,
    Get {
        key: Fingerprint,
        at: DateTime<Utc>,
    },
    Put {
        key: Fingerprint,
        at: DateTime<Utc>,
    },
    Delete {
        key: Fingerprint,
    },
}

/// Drains the mailbox until every sender is dropped.
pub(crate) fn run_worker(events: Receiver<MetadataEvent>, metadata: MetadataMap) {
    debug!("metadata worker started");
    for event in events {
        apply(&metadata, event);
    }
    debug!("metadata worker terminated");
}

fn apply(metadata: &MetadataMap, event: MetadataEvent) {
    match event {
        MetadataEvent::Initialize => {
            metadata.write().clear();
            trace!("metadata initialized");
        }
        MetadataEvent::Get { key, at } => {
            if let Some(item) = metadata.write().get_mut(&key) {
                item.access_count += 1;
                item.last_access = Some(at);
                trace!(%key, access_count = item.access_count, "access recorded");
            }
        }
        MetadataEvent::Put { key, at } => {
            let mut metadata = metadata.write();
            match metadata.get_mut(&key) {
                Some(item) => {
                    item.version += 1;
                    item.last_update = at;
                    trace!(%key, version = item.version, "update recorded");
                }
                None => {
                    trace!(%key, "metadata created");
                    metadata.insert(key, ItemMetadata::new(at));
                }
            }
        }
        MetadataEvent::Delete { key } => {
            if metadata.write().remove(&key).is_some() {
                trace!(%key, "metadata removed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn map() -> MetadataMap {
        Arc::new(RwLock::new(HashMap::new()))
    }

    #[test]
    fn test_event_sequence() {
        let metadata = map();
        let key = Fingerprint::new("k");
        let t0 = Utc::now();
        let t1 = t0 + TimeDelta::seconds(1);

        apply(&metadata, MetadataEvent::Get { key: key.clone(), at: t0 });
        assert!(metadata.read().get(&key).is_none(), "get never creates records");

        apply(&metadata, MetadataEvent::Put { key: key.clone(), at: t0 });
        apply(&metadata, MetadataEvent::Get { key: key.clone(), at: t1 });
        apply(&metadata, MetadataEvent::Put { key: key.clone(), at: t1 });

        let item = metadata.read().get(&key).cloned().unwrap();
        assert_eq!(item.version, 1);
        assert_eq!(item.access_count, 1);
        assert_eq!(item.created, t0);
        assert_eq!(item.last_update, t1);
        assert_eq!(item.last_used(), t1);

        apply(&metadata, MetadataEvent::Delete { key: key.clone() });
        assert!(metadata.read().is_empty());
    }

    #[test]
    fn test_initialize_seeds_empty_map() {
        let metadata = map();
        metadata
            .write()
            .insert(Fingerprint::new("stale"), ItemMetadata::new(Utc::now()));
        apply(&metadata, MetadataEvent::Initialize);
        assert!(metadata.read().is_empty());
    }
}
