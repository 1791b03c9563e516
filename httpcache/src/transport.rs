//! Outbound transport abstraction.

use async_trait::async_trait;
use http::{Request, Response};
use http_body::Body as HttpBody;

/// Something that turns a request into a response.
///
/// The cache engine decorates a transport: it calls
/// [`round_trip`](Transport::round_trip) for every request it cannot answer
/// itself and hands the error type through unchanged.
#[async_trait]
pub trait Transport<B>: Send + Sync
where
    B: Send + 'static,
{
    /// Body of the responses this transport produces.
    type Body: HttpBody + Send + 'static;

    /// Error reported when no response could be obtained.
    type Error: Send + 'static;

    /// Sends `request` and returns the response head with a streaming body.
    async fn round_trip(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error>;
}

#[async_trait]
impl<T, B> Transport<B> for &T
where
    T: Transport<B> + ?Sized,
    B: Send + 'static,
{
    type Body = T::Body;
    type Error = T::Error;

    async fn round_trip(&self, request: Request<B>) -> Result<Response<Self::Body>, Self::Error> {
        (**self).round_trip(request).await
    }
}

/// Transport backed by a [`reqwest::Client`].
///
/// This is the default transport of
/// [`CachingTransport::new`](crate::CachingTransport::new).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The wrapped client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport<reqwest::Body> for ReqwestTransport {
    type Body = reqwest::Body;
    type Error = reqwest::Error;

    async fn round_trip(
        &self,
        request: Request<reqwest::Body>,
    ) -> Result<Response<reqwest::Body>, reqwest::Error> {
        let request = reqwest::Request::try_from(request)?;
        let response = self.client.execute(request).await?;
        Ok(response.into())
    }
}
