//! The storage contract consumed by the cache engine.
//!
//! A store maps a [`Fingerprint`] to the raw bytes of a serialized response.
//! It knows nothing about HTTP semantics: freshness, revalidation and
//! serialization are handled by the engine. The contract only requires
//! read-your-writes for a single key from a single caller; implementations
//! are free to choose their own concurrency discipline.
//!
//! Operations are synchronous. The engine calls [`Store::put`] from inside
//! the final read of a response body, so implementations should not block
//! for long.
//!
//! # Implementing a store
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//!
//! use httpcache_core::{Fingerprint, PutStatus, Raw, Store};
//!
//! #[derive(Default)]
//! struct MutexStore(Mutex<HashMap<Fingerprint, Raw>>);
//!
//! impl Store for MutexStore {
//!     fn get(&self, key: &Fingerprint) -> Option<Raw> {
//!         self.0.lock().unwrap().get(key).cloned()
//!     }
//!
//!     fn put(&self, key: &Fingerprint, entry: Raw) -> PutStatus {
//!         self.0.lock().unwrap().insert(key.clone(), entry);
//!         PutStatus::Accepted
//!     }
//!
//!     fn delete(&self, key: &Fingerprint) {
//!         self.0.lock().unwrap().remove(key);
//!     }
//! }
//! ```

use std::sync::Arc;

use http::request::Parts;

use crate::{Fingerprint, Raw};

/// Outcome of [`Store::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutStatus {
    /// The entry was stored.
    Accepted,
    /// The store declined the entry (for example because it is too large).
    ///
    /// This is not a failure: the caller treats the response as not cached.
    Rejected,
}

impl PutStatus {
    /// Returns `true` for [`PutStatus::Accepted`].
    pub fn is_accepted(self) -> bool {
        matches!(self, PutStatus::Accepted)
    }
}

/// Key/value persistence for serialized responses.
pub trait Store: Send + Sync {
    /// Derives the key a request is stored under.
    ///
    /// The default is the full request URL, see [`Fingerprint::from_request`].
    fn fingerprint(&self, request: &Parts) -> Fingerprint {
        Fingerprint::from_request(request)
    }

    /// Returns a copy of the entry stored under `key`.
    fn get(&self, key: &Fingerprint) -> Option<Raw>;

    /// Stores `entry` under `key`, replacing any previous entry wholesale.
    fn put(&self, key: &Fingerprint, entry: Raw) -> PutStatus;

    /// Removes the entry stored under `key`, if any.
    fn delete(&self, key: &Fingerprint);
}

impl<S> Store for &S
where
    S: Store + ?Sized,
{
    fn fingerprint(&self, request: &Parts) -> Fingerprint {
        (**self).fingerprint(request)
    }

    fn get(&self, key: &Fingerprint) -> Option<Raw> {
        (**self).get(key)
    }

    fn put(&self, key: &Fingerprint, entry: Raw) -> PutStatus {
        (**self).put(key, entry)
    }

    fn delete(&self, key: &Fingerprint) {
        (**self).delete(key)
    }
}

impl<S> Store for Box<S>
where
    S: Store + ?Sized,
{
    fn fingerprint(&self, request: &Parts) -> Fingerprint {
        (**self).fingerprint(request)
    }

    fn get(&self, key: &Fingerprint) -> Option<Raw> {
        (**self).get(key)
    }

    fn put(&self, key: &Fingerprint, entry: Raw) -> PutStatus {
        (**self).put(key, entry)
    }

    fn delete(&self, key: &Fingerprint) {
        (**self).delete(key)
    }
}

impl<S> Store for Arc<S>
where
    S: Store + ?Sized,
{
    fn fingerprint(&self, request: &Parts) -> Fingerprint {
        (**self).fingerprint(request)
    }

    fn get(&self, key: &Fingerprint) -> Option<Raw> {
        (**self).get(key)
    }

    fn put(&self, key: &Fingerprint, entry: Raw) -> PutStatus {
        (**self).put(key, entry)
    }

    fn delete(&self, key: &Fingerprint) {
        (**self).delete(key)
    }
}
