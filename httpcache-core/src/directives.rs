//! `Cache-Control` directive parsing.
//!
//! The grammar understood here is deliberately small: a comma separated list
//! of `token` or `token=value` items, whitespace trimmed around every item,
//! name and value. Quoted values are not supported, so a directive whose
//! value contains a comma is split at that comma.

use std::collections::HashMap;

use chrono::TimeDelta;
use http::HeaderMap;
use http::header::CACHE_CONTROL;
use smol_str::SmolStr;

use crate::DirectiveError;

/// Directive names recognized by the cache.
pub mod directive {
    /// Request: bypass the cache. Response: always revalidate.
    pub const NO_CACHE: &str = "no-cache";
    /// Never store the response.
    pub const NO_STORE: &str = "no-store";
    /// Request: serve from cache without revalidation.
    pub const ONLY_IF_CACHED: &str = "only-if-cached";
    /// Freshness lifetime in seconds.
    pub const MAX_AGE: &str = "max-age";
    /// Request: the response must stay fresh for at least this many seconds.
    pub const MIN_FRESH: &str = "min-fresh";
    /// Request: accept stale responses. Parsed, never consulted.
    pub const MAX_STALE: &str = "max-stale";
}

/// Parsed `Cache-Control` directives of a single message.
///
/// Bare tokens (`no-cache`) map to an empty value. Directive names are
/// lowercased, values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: HashMap<SmolStr, SmolStr>,
}

impl CacheControl {
    /// Parses a single `Cache-Control` header value.
    ///
    /// ```
    /// use httpcache_core::CacheControl;
    ///
    /// let cc = CacheControl::parse("public, max-age = 60,no-cache");
    /// assert_eq!(cc.get("max-age"), Some("60"));
    /// assert_eq!(cc.get("no-cache"), Some(""));
    /// assert!(!cc.contains("no-store"));
    /// ```
    pub fn parse(value: &str) -> Self {
        let mut cc = Self::default();
        cc.extend_from(value);
        cc
    }

    /// Parses every `Cache-Control` header present in `headers`.
    ///
    /// Several header lines behave as one comma-joined list. Values that are
    /// not valid visible ASCII are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cc = Self::default();
        for value in headers.get_all(CACHE_CONTROL) {
            match value.to_str() {
                Ok(value) => cc.extend_from(value),
                Err(_) => tracing::warn!(?value, "skipping non-ASCII Cache-Control value"),
            }
        }
        cc
    }

    fn extend_from(&mut self, value: &str) {
        for item in value.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (name, value) = match item.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => (item, ""),
            };
            self.directives
                .insert(SmolStr::new(name.to_ascii_lowercase()), SmolStr::new(value));
        }
    }

    /// Returns `true` if the directive is present, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Returns the raw value of a directive; bare tokens yield `""`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.directives.get(name).map(SmolStr::as_str)
    }

    /// Reads a delta-seconds directive such as `max-age`.
    ///
    /// Returns `None` if the directive is absent and an error if its value is
    /// not an integer. Negative values are accepted as-is.
    pub fn seconds(&self, name: &str) -> Option<Result<TimeDelta, DirectiveError>> {
        self.get(name).map(|value| {
            value
                .parse::<i64>()
                .ok()
                .and_then(TimeDelta::try_seconds)
                .ok_or_else(|| DirectiveError::NotSeconds {
                    name: name.to_owned(),
                    value: value.to_owned(),
                })
        })
    }

    /// Number of distinct directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if no directive was found.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Iterates over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.directives
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
