//! The cache decision engine.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use http::header::RANGE;
use http::request::Parts;
use http::{Method, Request, Response, StatusCode};
use httpcache_core::directives::directive;
use httpcache_core::{CacheControl, Fingerprint, Freshness, PutStatus, Raw, Store, classify};
use httpcache_http::{
    CacheBody, CachedResponseExt, CaptureBody, OnComplete, SpillBuffer, SpillReader, wire,
};
use tracing::{Instrument, Span, debug, debug_span, field, warn};

use crate::config::CacheConfig;
use crate::metrics;
use crate::revalidate;
use crate::transport::Transport;

/// Client-side HTTP cache in front of a [`Transport`].
///
/// For every request the engine:
///
/// 1. looks the request up in the store if it is a `GET` or `HEAD` without
///    a `Range` header,
/// 2. classifies a found entry with [`classify`],
/// 3. answers fresh entries itself, marked with `x-cached: true`,
/// 4. adds `If-None-Match` / `If-Modified-Since` for stale entries,
/// 5. merges a `304 Not Modified` into the stored entry, stores the result
///    and answers with it,
/// 6. stores successful responses unless `no-store` is present on either side.
///
/// `GET` responses are stored only after the caller has read the whole body:
/// the body is wrapped in a [`CaptureBody`] and the store write happens inside
/// the read that reaches the end. A body that is dropped early is never
/// stored. `HEAD` responses are stored right away.
///
/// Transport errors and 5xx responses are passed through; a stale entry is
/// never served in their place.
#[derive(Debug)]
pub struct HttpCache<S> {
    store: Arc<S>,
    config: CacheConfig,
}

impl<S> Clone for HttpCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S> HttpCache<S>
where
    S: Store + 'static,
{
    /// Creates an engine with the default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(store: Arc<S>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// The store entries are kept in.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The engine configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Answers `request` from the cache or through `transport`.
    pub async fn round_trip<T, B>(
        &self,
        transport: &T,
        request: Request<B>,
    ) -> Result<Response<CacheBody<T::Body>>, T::Error>
    where
        T: Transport<B> + ?Sized,
        B: Send + 'static,
    {
        let (parts, body) = request.into_parts();
        let key = self.store.fingerprint(&parts);
        let span = debug_span!(
            "httpcache.round_trip",
            key = %key,
            method = %parts.method,
            outcome = field::Empty,
        );
        self.handle(transport, parts, body, key)
            .instrument(span)
            .await
    }

    async fn handle<T, B>(
        &self,
        transport: &T,
        mut parts: Parts,
        body: B,
        key: Fingerprint,
    ) -> Result<Response<CacheBody<T::Body>>, T::Error>
    where
        T: Transport<B> + ?Sized,
        B: Send + 'static,
    {
        let cacheable = is_cacheable(&parts);
        let cached = if cacheable { self.lookup(&key) } else { None };

        let cached = match cached {
            Some(entry) => {
                let freshness = classify(&parts.headers, entry.headers(), Utc::now());
                Span::current().record("outcome", freshness.as_str());
                metrics::record_freshness(freshness);
                match freshness {
                    Freshness::Fresh => {
                        debug!("serving fresh entry");
                        return Ok(serve_cached(entry));
                    }
                    Freshness::Stale => {
                        revalidate::add_conditional_headers(&mut parts.headers, entry.headers());
                        debug!("revalidating stale entry");
                    }
                    Freshness::Transparent => debug!("request bypasses cached entry"),
                }
                Some(entry)
            }
            None => {
                if cacheable {
                    Span::current().record("outcome", "miss");
                    metrics::record_miss();
                } else {
                    Span::current().record("outcome", "uncacheable");
                }
                None
            }
        };

        let method = parts.method.clone();
        let request_no_store =
            CacheControl::from_headers(&parts.headers).contains(directive::NO_STORE);

        let response = transport.round_trip(Request::from_parts(parts, body)).await?;
        let (parts, body) = response.into_parts();

        if parts.status == StatusCode::NOT_MODIFIED
            && let Some(mut entry) = cached
        {
            revalidate::merge_not_modified(entry.headers_mut(), &parts.headers);
            Span::current().record("outcome", "revalidated");
            metrics::record_revalidated();
            debug!("entry revalidated by origin");
            if !request_no_store
                && !CacheControl::from_headers(entry.headers()).contains(directive::NO_STORE)
            {
                let raw = wire::encode(
                    entry.status(),
                    entry.version(),
                    entry.headers(),
                    entry.body(),
                );
                put_entry(&*self.store, &key, raw);
            }
            return Ok(serve_cached(entry));
        }

        let storable = cacheable
            && parts.status.is_success()
            && !request_no_store
            && !CacheControl::from_headers(&parts.headers).contains(directive::NO_STORE);
        if !storable {
            debug!(status = parts.status.as_u16(), "response not stored");
            return Ok(Response::from_parts(parts, CacheBody::Upstream(body)));
        }

        if method == Method::GET {
            let on_complete = self.store_on_complete(key, &parts);
            let buffer = SpillBuffer::new(self.config.spill_threshold);
            let body = CaptureBody::new(body, buffer, on_complete);
            return Ok(Response::from_parts(parts, CacheBody::Capture(body)));
        }

        let entry = wire::encode(parts.status, parts.version, &parts.headers, &[]);
        put_entry(&*self.store, &key, entry);
        Ok(Response::from_parts(parts, CacheBody::Upstream(body)))
    }

    fn lookup(&self, key: &Fingerprint) -> Option<Response<Bytes>> {
        let raw = self.store.get(key)?;
        match wire::decode(raw) {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%key, %error, "ignoring undecodable cached entry");
                None
            }
        }
    }

    fn store_on_complete(&self, key: Fingerprint, parts: &http::response::Parts) -> OnComplete {
        let store = Arc::clone(&self.store);
        let status = parts.status;
        let version = parts.version;
        let headers = parts.headers.clone();
        Box::new(move |reader: SpillReader| match reader.into_bytes() {
            Ok(body) => {
                let entry = wire::encode(status, version, &headers, &body);
                put_entry(&*store, &key, entry);
            }
            Err(error) => warn!(%key, %error, "captured body could not be read back"),
        })
    }
}

fn is_cacheable(parts: &Parts) -> bool {
    (parts.method == Method::GET || parts.method == Method::HEAD)
        && !parts.headers.contains_key(RANGE)
}

fn serve_cached<B>(entry: Response<Bytes>) -> Response<CacheBody<B>> {
    let (mut parts, body) = entry.into_parts();
    parts.headers.mark_cached();
    Response::from_parts(parts, CacheBody::cached(body))
}

fn put_entry<S>(store: &S, key: &Fingerprint, entry: Raw)
where
    S: Store + ?Sized,
{
    let bytes = entry.len();
    match store.put(key, entry) {
        PutStatus::Accepted => debug!(%key, bytes, "response stored"),
        PutStatus::Rejected => {
            metrics::record_store_rejected();
            debug!(%key, bytes, "store rejected response");
        }
    }
}
