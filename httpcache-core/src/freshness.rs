//! Freshness classification of cached responses.
//!
//! Classification is computed per request from the current time, the request
//! headers and the cached response headers; it is never persisted.
//!
//! Decision order:
//!
//! 1. request `no-cache` → [`Freshness::Transparent`]
//! 2. response `no-cache` → [`Freshness::Stale`]
//! 3. request `only-if-cached` → [`Freshness::Fresh`], regardless of age
//! 4. no usable `Date` on the cached response → [`Freshness::Stale`]
//! 5. otherwise compare the freshness lifetime against the response age
//!
//! The lifetime is the response `max-age`, else `Expires - Date`, else zero.
//! A request `max-age` replaces it. A request `min-fresh` demands that much
//! remaining lifetime, so the entry turns stale once `age >= ttl - min-fresh`.
//! The sum saturates, so an oversized `min-fresh` always yields stale.
//! `max-stale` is parsed but not consulted.

use chrono::{DateTime, TimeDelta, Utc};
use http::HeaderMap;
use http::header::{DATE, EXPIRES};
use tracing::{debug, warn};

use crate::date::header_date;
use crate::directives::directive;
use crate::{CacheControl, DateError};

/// Outcome of classifying a cached response against a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The cached response may be served without contacting the origin.
    Fresh,
    /// The cached response must be revalidated with a conditional request.
    Stale,
    /// The cache is bypassed and the request forwarded unmodified.
    Transparent,
}

impl Freshness {
    /// Lowercase name, used in logs and metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Stale => "stale",
            Freshness::Transparent => "transparent",
        }
    }
}

/// Classifies a cached response for the given request at time `now`.
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use http::HeaderMap;
/// use httpcache_core::{Freshness, classify, format_http_date};
///
/// let date = Utc::now();
/// let mut cached = HeaderMap::new();
/// cached.insert("date", format_http_date(date).parse().unwrap());
/// cached.insert("cache-control", "max-age=60".parse().unwrap());
///
/// let request = HeaderMap::new();
/// assert_eq!(classify(&request, &cached, date + TimeDelta::seconds(30)), Freshness::Fresh);
/// assert_eq!(classify(&request, &cached, date + TimeDelta::seconds(60)), Freshness::Stale);
/// ```
pub fn classify(request: &HeaderMap, cached: &HeaderMap, now: DateTime<Utc>) -> Freshness {
    let request_cc = CacheControl::from_headers(request);
    let response_cc = CacheControl::from_headers(cached);

    if request_cc.contains(directive::NO_CACHE) {
        return Freshness::Transparent;
    }
    if response_cc.contains(directive::NO_CACHE) {
        return Freshness::Stale;
    }
    if request_cc.contains(directive::ONLY_IF_CACHED) {
        return Freshness::Fresh;
    }

    let date = match header_date(cached, DATE) {
        Ok(date) => date,
        Err(DateError::Missing) => {
            debug!("cached response has no Date header, treating as stale");
            return Freshness::Stale;
        }
        Err(error) => {
            warn!(%error, "cached response has an unusable Date header, treating as stale");
            return Freshness::Stale;
        }
    };

    let mut age = now - date;
    let mut ttl = response_lifetime(&response_cc, cached, date);

    if let Some(max_age) = request_cc.seconds(directive::MAX_AGE) {
        ttl = max_age.unwrap_or_else(|error| {
            warn!(%error, "malformed request max-age, ttl=0");
            TimeDelta::zero()
        });
    }

    match request_cc.seconds(directive::MIN_FRESH) {
        Some(Ok(min_fresh)) => age = age.checked_add(&min_fresh).unwrap_or(TimeDelta::MAX),
        Some(Err(error)) => debug!(%error, "ignoring malformed min-fresh"),
        None => {}
    }

    debug!(
        ttl = ttl.num_milliseconds(),
        age = age.num_milliseconds(),
        "freshness lifetime vs. age (ms)"
    );
    if ttl > age {
        Freshness::Fresh
    } else {
        Freshness::Stale
    }
}

/// Freshness lifetime announced by the response itself.
fn response_lifetime(cc: &CacheControl, headers: &HeaderMap, date: DateTime<Utc>) -> TimeDelta {
    if let Some(max_age) = cc.seconds(directive::MAX_AGE) {
        return max_age.unwrap_or_else(|error| {
            warn!(%error, "malformed response max-age, ttl=0");
            TimeDelta::zero()
        });
    }

    match header_date(headers, EXPIRES) {
        Ok(expires) => expires - date,
        Err(DateError::Missing) => TimeDelta::zero(),
        Err(error) => {
            warn!(%error, "malformed Expires header, ttl=0");
            TimeDelta::zero()
        }
    }
}
