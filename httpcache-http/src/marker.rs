//! Served-from-cache marker.
//!
//! Every response the cache answers itself, either a fresh hit or a stored
//! entry refreshed by a `304 Not Modified`, carries `x-cached: true`.
//! Responses that came from the origin never carry it.

use http::{HeaderMap, HeaderValue, Response, header::HeaderName};

/// Name of the served-from-cache header.
pub const CACHE_MARKER_HEADER: HeaderName = HeaderName::from_static("x-cached");

/// Value of the served-from-cache header.
pub const CACHE_MARKER_VALUE: HeaderValue = HeaderValue::from_static("true");

/// Access to the served-from-cache marker of a response.
pub trait CachedResponseExt {
    /// Adds the marker.
    fn mark_cached(&mut self);

    /// Returns `true` if the marker is present.
    fn is_cached(&self) -> bool;
}

impl CachedResponseExt for HeaderMap {
    fn mark_cached(&mut self) {
        self.insert(CACHE_MARKER_HEADER, CACHE_MARKER_VALUE);
    }

    fn is_cached(&self) -> bool {
        self.get(CACHE_MARKER_HEADER) == Some(&CACHE_MARKER_VALUE)
    }
}

impl<B> CachedResponseExt for Response<B> {
    fn mark_cached(&mut self) {
        self.headers_mut().mark_cached();
    }

    fn is_cached(&self) -> bool {
        self.headers().is_cached()
    }
}
