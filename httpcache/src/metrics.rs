//! Cache decision metrics.
//!
//! Enable the `metrics` feature to record them; without it every function
//! here is a no-op.
//!
//! ## Metrics
//!
//! - `httpcache_fresh_total` - cached entries served without contacting the origin
//! - `httpcache_stale_total` - cached entries sent for revalidation
//! - `httpcache_transparent_total` - requests that bypassed an existing entry
//! - `httpcache_miss_total` - cacheable requests without a usable entry
//! - `httpcache_revalidated_total` - entries refreshed by `304 Not Modified`
//! - `httpcache_store_rejected_total` - responses the store declined

use httpcache_core::Freshness;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of fresh hits.
    pub static ref FRESH_COUNTER: &'static str = {
        metrics::describe_counter!(
            "httpcache_fresh_total",
            "Total number of cached entries served without contacting the origin."
        );
        "httpcache_fresh_total"
    };
    /// Track number of stale entries sent for revalidation.
    pub static ref STALE_COUNTER: &'static str = {
        metrics::describe_counter!(
            "httpcache_stale_total",
            "Total number of stale cached entries sent for revalidation."
        );
        "httpcache_stale_total"
    };
    /// Track number of requests that bypassed an existing entry.
    pub static ref TRANSPARENT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "httpcache_transparent_total",
            "Total number of requests that bypassed an existing cached entry."
        );
        "httpcache_transparent_total"
    };
    /// Track number of cacheable requests without an entry.
    pub static ref MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "httpcache_miss_total",
            "Total number of cacheable requests without a usable cached entry."
        );
        "httpcache_miss_total"
    };
    /// Track number of entries refreshed by the origin.
    pub static ref REVALIDATED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "httpcache_revalidated_total",
            "Total number of cached entries refreshed by 304 Not Modified."
        );
        "httpcache_revalidated_total"
    };
    /// Track number of responses the store declined.
    pub static ref STORE_REJECTED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "httpcache_store_rejected_total",
            "Total number of responses the store declined to keep."
        );
        "httpcache_store_rejected_total"
    };
}

/// Record the classification of a cached entry.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_freshness(freshness: Freshness) {
    let counter = match freshness {
        Freshness::Fresh => *FRESH_COUNTER,
        Freshness::Stale => *STALE_COUNTER,
        Freshness::Transparent => *TRANSPARENT_COUNTER,
    };
    metrics::counter!(counter).increment(1);
}

/// Record the classification of a cached entry (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_freshness(_freshness: Freshness) {}

/// Record a cacheable request without an entry.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_miss() {
    metrics::counter!(*MISS_COUNTER).increment(1);
}

/// Record a cacheable request without an entry (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_miss() {}

/// Record an entry refreshed by `304 Not Modified`.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_revalidated() {
    metrics::counter!(*REVALIDATED_COUNTER).increment(1);
}

/// Record an entry refreshed by `304 Not Modified` (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_revalidated() {}

/// Record a response the store declined.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_store_rejected() {
    metrics::counter!(*STORE_REJECTED_COUNTER).increment(1);
}

/// Record a response the store declined (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_store_rejected() {}
