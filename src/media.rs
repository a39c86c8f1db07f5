//! The [`MediaHandle`] abstraction over a loaded, seekable video resource.
//!
//! A `MediaHandle` owns exactly one decode position. Moving it is requested
//! through [`seek`](MediaHandle::seek), which registers a one-shot readiness
//! subscription *before* the position changes and hands the caller a
//! [`FrameReady`] future. The frame at the new position is observable through
//! [`current_frame`](MediaHandle::current_frame) once that future resolves.
//!
//! The decode position is the only shared mutable state in the pipeline, and
//! it has a single hard ordering rule: it must never be moved again before
//! the previous move's readiness signal has been consumed. The `&mut self`
//! receiver on `seek` makes a second in-flight seek from a single owner a
//! compile error; callers that split ownership are responsible for awaiting
//! each [`FrameReady`] before issuing the next seek.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use image::RgbImage;
use tokio::sync::oneshot;

use crate::error::Error;

/// A loaded, seekable video resource.
///
/// Implementations are owned by the host; the sampling/export pipeline only
/// consumes them. [`VideoFile`](crate::VideoFile) is the FFmpeg-backed
/// implementation shipped with this crate.
pub trait MediaHandle {
    /// Total duration of the resource. Non-negative; zero when unknown.
    fn duration(&self) -> Duration;

    /// Width of the video at its native resolution, in pixels.
    fn natural_width(&self) -> u32;

    /// Height of the video at its native resolution, in pixels.
    fn natural_height(&self) -> u32;

    /// Move the decode position to `position`, clamped to `[0, duration]`.
    ///
    /// The returned [`FrameReady`] resolves once the frame at the new
    /// position has actually been decoded and is visible through
    /// [`current_frame`](MediaHandle::current_frame). The readiness
    /// subscription is single-use: it is registered before the position
    /// moves and torn down when the future resolves or is dropped, so a
    /// stale signal from an earlier seek can never resolve a later call.
    fn seek(&mut self, position: Duration) -> FrameReady;

    /// The most recently decoded frame at natural resolution, if any.
    fn current_frame(&self) -> Option<RgbImage>;
}

/// One-shot future that resolves when a seek's target frame is decoded.
///
/// Obtained from [`MediaHandle::seek`]. Resolves with:
///
/// - `Ok(())` once the frame is ready,
/// - `Err(`[`Error::CaptureStalled`]`)` if the signalling side was dropped
///   without firing (the media resource was torn down mid-seek),
/// - any error the media implementation reported for this seek.
#[must_use = "a seek does not complete until its FrameReady is awaited"]
pub struct FrameReady {
    receiver: oneshot::Receiver<Result<(), Error>>,
}

impl FrameReady {
    /// Create a connected signal/future pair.
    ///
    /// Media implementations call this inside [`MediaHandle::seek`]: keep
    /// the [`ReadySignal`], return the `FrameReady`, and fire the signal
    /// once the frame at the requested position has been decoded.
    pub fn channel() -> (ReadySignal, FrameReady) {
        let (sender, receiver) = oneshot::channel();
        (ReadySignal { sender }, FrameReady { receiver })
    }
}

impl Future for FrameReady {
    type Output = Result<(), Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // Sender dropped without firing: the resource went away.
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::CaptureStalled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// The signalling half of a [`FrameReady`] pair.
///
/// Consumed on use: a signal fires at most once per seek.
pub struct ReadySignal {
    sender: oneshot::Sender<Result<(), Error>>,
}

impl ReadySignal {
    /// Report that the frame at the seek target has been decoded.
    pub fn notify(self) {
        let _ = self.sender.send(Ok(()));
    }

    /// Report that decoding the seek target failed.
    pub fn fail(self, error: Error) {
        let _ = self.sender.send(Err(error));
    }
}

/// Clamp a requested position into the valid `[0, duration]` range.
///
/// Shared helper for [`MediaHandle`] implementations.
pub fn clamp_position(position: Duration, duration: Duration) -> Duration {
    position.min(duration)
}
