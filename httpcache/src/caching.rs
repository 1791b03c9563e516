//! Transport decorator.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Request, Response};
use httpcache_core::Store;
use httpcache_http::CacheBody;

use crate::config::CacheConfig;
use crate::engine::HttpCache;
use crate::transport::{ReqwestTransport, Transport};

/// A [`Transport`] that answers from a cache before delegating to another
/// transport.
///
/// ```no_run
/// use std::sync::Arc;
/// use httpcache::{CachingTransport, Transport};
/// use httpcache_memory::MemoryStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new(1024 * 1024)?);
/// let transport = CachingTransport::new(store);
///
/// let request = http::Request::get("http://example.com/")
///     .body(reqwest::Body::from(Vec::new()))?;
/// let response = transport.round_trip(request).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CachingTransport<S, T = ReqwestTransport> {
    cache: HttpCache<S>,
    transport: T,
}

impl<S> CachingTransport<S>
where
    S: Store + 'static,
{
    /// Caches in front of a default [`reqwest::Client`].
    pub fn new(store: Arc<S>) -> Self {
        Self::with_transport(store, ReqwestTransport::default())
    }
}

impl<S, T> CachingTransport<S, T>
where
    S: Store + 'static,
{
    /// Caches in front of `transport`.
    pub fn with_transport(store: Arc<S>, transport: T) -> Self {
        Self {
            cache: HttpCache::new(store),
            transport,
        }
    }

    /// Replaces the engine configuration.
    pub fn with_config(self, config: CacheConfig) -> Self {
        Self {
            cache: HttpCache::with_config(Arc::clone(self.cache.store()), config),
            transport: self.transport,
        }
    }

    /// The cache engine.
    pub fn cache(&self) -> &HttpCache<S> {
        &self.cache
    }

    /// The decorated transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<S, T, B> Transport<B> for CachingTransport<S, T>
where
    S: Store + 'static,
    T: Transport<B>,
    B: Send + 'static,
{
    type Body = CacheBody<T::Body>;
    type Error = T::Error;

    async fn round_trip(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error> {
        self.cache.round_trip(&self.transport, request).await
    }
}
