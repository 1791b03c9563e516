//! Response body returned by the cache engine.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::pin_project;

use crate::capture::{CaptureBody, OnComplete};
use crate::spill::SpillReader;

/// Body of a response produced by the cache.
///
/// # Variants
///
/// - [`Cached`](CacheBody::Cached): body of a stored entry, yielded as one frame
/// - [`Capture`](CacheBody::Capture): upstream body being captured for storage
/// - [`Upstream`](CacheBody::Upstream): upstream body passed through untouched
#[pin_project(project = CacheBodyProj)]
pub enum CacheBody<B, F = OnComplete> {
    /// Body of a stored entry.
    ///
    /// The `Option` is used to yield the data once, then return `None` on subsequent polls.
    Cached(Option<Bytes>),

    /// Upstream body whose bytes are copied into the store once fully read.
    Capture(#[pin] CaptureBody<B, F>),

    /// Upstream body that is not stored.
    Upstream(#[pin] B),
}

impl<B, F> CacheBody<B, F> {
    /// Creates a body from stored bytes. An empty body yields no frames.
    pub fn cached(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            CacheBody::Cached(None)
        } else {
            CacheBody::Cached(Some(bytes))
        }
    }

    /// Returns `true` if the body comes from a stored entry.
    pub fn is_cached(&self) -> bool {
        matches!(self, CacheBody::Cached(_))
    }
}

impl<B, F> HttpBody for CacheBody<B, F>
where
    B: HttpBody,
    F: FnOnce(SpillReader),
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            CacheBodyProj::Cached(data) => {
                Poll::Ready(data.take().map(|bytes| Ok(Frame::data(bytes))))
            }
            CacheBodyProj::Capture(body) => body.poll_frame(cx),
            CacheBodyProj::Upstream(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            CacheBody::Cached(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            CacheBody::Cached(None) => SizeHint::with_exact(0),
            CacheBody::Capture(body) => body.size_hint(),
            CacheBody::Upstream(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            CacheBody::Cached(data) => data.is_none(),
            CacheBody::Capture(body) => body.is_end_stream(),
            CacheBody::Upstream(body) => body.is_end_stream(),
        }
    }
}
