#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod caching;
pub mod config;
mod engine;
pub mod metrics;
mod middleware;
mod revalidate;
mod transport;

pub use caching::CachingTransport;
pub use config::CacheConfig;
pub use engine::HttpCache;
pub use middleware::{CacheMiddleware, NextTransport};
pub use transport::{ReqwestTransport, Transport};

// Re-export the store contract and decision types
pub use httpcache_core::{
    CacheControl, Fingerprint, Freshness, PutStatus, Raw, Store, classify, format_http_date,
    parse_http_date,
};

// Re-export body and marker types
pub use httpcache_http::marker::{CACHE_MARKER_HEADER, CACHE_MARKER_VALUE};
pub use httpcache_http::{CacheBody, CachedResponseExt};
