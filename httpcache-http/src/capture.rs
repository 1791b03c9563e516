//! Deferred capture of a response body.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{Buf, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};
use pin_project::{pin_project, pinned_drop};
use tracing::{debug, trace, warn};

use crate::spill::{SpillBuffer, SpillReader};

/// Boxed completion callback used by the engine.
pub type OnComplete = Box<dyn FnOnce(SpillReader) + Send + Sync>;

struct Pending<F> {
    buffer: SpillBuffer,
    on_complete: F,
}

/// Body wrapper that tees every data frame into a [`SpillBuffer`].
///
/// When the wrapped body ends, the buffer is finalized and `on_complete`
/// runs with a reader over the captured bytes. This happens synchronously
/// inside the poll that observes the end of the body, at most once.
///
/// The capture is abandoned (the callback never runs) when:
/// - the consumer drops the body before reaching the end,
/// - the wrapped body yields an error,
/// - the buffer fails to write.
///
/// In every case the consumer still receives exactly the frames and errors
/// of the wrapped body. Trailers are forwarded but not captured.
#[pin_project(PinnedDrop)]
pub struct CaptureBody<B, F = OnComplete> {
    #[pin]
    inner: B,
    capture: Option<Pending<F>>,
}

impl<B, F> CaptureBody<B, F>
where
    F: FnOnce(SpillReader),
{
    /// Wraps `inner`, capturing into `buffer`.
    pub fn new(inner: B, buffer: SpillBuffer, on_complete: F) -> Self {
        Self {
            inner,
            capture: Some(Pending {
                buffer,
                on_complete,
            }),
        }
    }
}

impl<B, F> CaptureBody<B, F> {
    /// Returns `true` until the capture completes or is abandoned.
    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }
}

fn complete<F>(capture: &mut Option<Pending<F>>)
where
    F: FnOnce(SpillReader),
{
    let Some(Pending {
        mut buffer,
        on_complete,
    }) = capture.take()
    else {
        return;
    };
    match buffer.finalize() {
        Ok(reader) => {
            debug!(
                bytes = buffer.len(),
                spilled = buffer.is_spilled(),
                "body capture complete"
            );
            on_complete(reader);
        }
        Err(error) => warn!(%error, "body capture abandoned: finalize failed"),
    }
}

impl<B, F> HttpBody for CaptureBody<B, F>
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
        let mut this = self.project();
        match ready!(this.inner.as_mut().poll_frame(cx)) {
            Some(Ok(frame)) => {
                let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                if let Some(data) = frame.data_ref() {
                    let failed = match this.capture.as_mut() {
                        Some(pending) => pending.buffer.write(data).err(),
                        None => None,
                    };
                    if let Some(error) = failed {
                        warn!(%error, "body capture abandoned: buffer write failed");
                        *this.capture = None;
                    }
                }
                if this.inner.is_end_stream() {
                    complete(this.capture);
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Some(Err(error)) => {
                if this.capture.take().is_some() {
                    debug!("body capture abandoned: upstream body failed");
                }
                Poll::Ready(Some(Err(error)))
            }
            None => {
                complete(this.capture);
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        // Hold the stream open until the end has been observed by a poll.
        self.capture.is_none() && self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

#[pinned_drop]
impl<B, F> PinnedDrop for CaptureBody<B, F> {
    fn drop(self: Pin<&mut Self>) {
        if let Some(pending) = self.capture.as_ref() {
            trace!(
                bytes = pending.buffer.len(),
                "body capture abandoned: dropped before end of stream"
            );
        }
    }
}

impl<B, F> fmt::Debug for CaptureBody<B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBody")
            .field("capturing", &self.is_capturing())
            .finish_non_exhaustive()
    }
}
