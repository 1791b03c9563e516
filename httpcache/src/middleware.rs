//! Cache middleware for reqwest via [`reqwest_middleware`].
//!
//! This module provides [`CacheMiddleware`], which plugs the cache into a
//! `reqwest_middleware` client stack. Everything after the middleware in the
//! chain is the transport the cache decorates.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use httpcache::CacheMiddleware;
//! use httpcache_memory::MemoryStore;
//! use reqwest_middleware::ClientBuilder;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new(1024 * 1024)?);
//! let client = ClientBuilder::new(reqwest::Client::new())
//!     .with(CacheMiddleware::new(store))
//!     .build();
//!
//! let response = client.get("http://example.com/").send().await?;
//! let is_hit = response.headers().contains_key("x-cached");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use httpcache_core::Store;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

use crate::config::CacheConfig;
use crate::engine::HttpCache;
use crate::transport::Transport;

/// Caching middleware for `reqwest_middleware::ClientWithMiddleware`.
///
/// Bodies of uncached `GET` responses are stored once the caller has read
/// them to the end, for example with `Response::bytes` or `Response::text`.
#[derive(Debug)]
pub struct CacheMiddleware<S> {
    cache: HttpCache<S>,
}

impl<S> CacheMiddleware<S>
where
    S: Store + 'static,
{
    /// Creates a middleware with the default engine configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            cache: HttpCache::new(store),
        }
    }

    /// Creates a middleware with an explicit engine configuration.
    pub fn with_config(store: Arc<S>, config: CacheConfig) -> Self {
        Self {
            cache: HttpCache::with_config(store, config),
        }
    }

    /// The cache engine.
    pub fn cache(&self) -> &HttpCache<S> {
        &self.cache
    }
}

impl<S> Clone for CacheMiddleware<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

#[async_trait]
impl<S> Middleware for CacheMiddleware<S>
where
    S: Store + 'static,
{
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let http_request: http::Request<reqwest::Body> = req
            .try_into()
            .map_err(|e: reqwest::Error| reqwest_middleware::Error::Reqwest(e))?;

        let transport = NextTransport::new(next, extensions.clone());
        let response = self.cache.round_trip(&transport, http_request).await?;

        Ok(response.map(reqwest::Body::wrap).into())
    }
}

/// Transport that bridges reqwest-middleware's `Next<'a>` to [`Transport`].
///
/// Every round trip runs the rest of the chain with its own copy of the
/// request extensions.
pub struct NextTransport<'a> {
    next: Next<'a>,
    extensions: Extensions,
}

impl<'a> NextTransport<'a> {
    /// Create a new transport over the remaining middleware chain.
    pub fn new(next: Next<'a>, extensions: Extensions) -> Self {
        Self { next, extensions }
    }
}

#[async_trait]
impl<'a> Transport<reqwest::Body> for NextTransport<'a> {
    type Body = reqwest::Body;
    type Error = reqwest_middleware::Error;

    async fn round_trip(
        &self,
        request: http::Request<reqwest::Body>,
    ) -> Result<http::Response<reqwest::Body>> {
        let request: reqwest::Request = request
            .try_into()
            .map_err(|e: reqwest::Error| reqwest_middleware::Error::Reqwest(e))?;
        let mut extensions = self.extensions.clone();
        let response = self.next.clone().run(request, &mut extensions).await?;
        Ok(response.into())
    }
}
