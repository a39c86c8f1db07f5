//! The seek-and-capture primitive.
//!
//! [`seek_and_capture`] is the single unit of work everything else in the
//! pipeline is built from: move the shared decode position, suspend until
//! the frame at that position is actually decoded, then rasterize and encode
//! it through the [`CaptureSurface`](crate::CaptureSurface).
//!
//! It is also the unit of concurrency control. The primitive does not
//! serialize callers itself: it borrows the media handle mutably for its
//! whole lifetime, so a single owner physically cannot have two captures in
//! flight, and batch drivers ([`sample`](crate::sample),
//! [`compile_export`](crate::compile_export)) await each call before issuing
//! the next. Captures are never cached: re-requesting a timestamp at a new
//! resolution re-decodes it.

use std::time::Duration;

use crate::error::Error;
use crate::media::MediaHandle;
use crate::surface::{CaptureSurface, EncodedFrame};

/// A single capture request: where to seek and what resolution to produce.
///
/// Transient value object; built per call and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureJob {
    /// Media timestamp to capture at.
    pub timestamp: Duration,
    /// Output raster width in pixels.
    pub target_width: u32,
    /// Output raster height in pixels.
    pub target_height: u32,
}

impl CaptureJob {
    /// Create a capture job.
    pub fn new(timestamp: Duration, target_width: u32, target_height: u32) -> Self {
        Self {
            timestamp,
            target_width,
            target_height,
        }
    }
}

/// Seek the media to `job.timestamp`, wait for the frame to decode, and
/// capture it at the job's target resolution.
///
/// The readiness subscription is registered by [`MediaHandle::seek`] before
/// the position moves and consumed exactly once here, so notifications can
/// never leak across calls.
///
/// # Errors
///
/// - [`Error::CaptureStalled`] if the media is torn down mid-seek.
/// - [`Error::NoFrameDecoded`] if the media signalled readiness without
///   publishing a frame.
/// - Any decode or encode error reported for this seek.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framesift::{CaptureJob, CaptureSurface, VideoFile, seek_and_capture};
///
/// # async fn example() -> Result<(), framesift::Error> {
/// let mut media = VideoFile::open("input.mp4")?;
/// let mut surface = CaptureSurface::new();
///
/// let job = CaptureJob::new(Duration::from_secs(7), 1920, 1080);
/// let frame = seek_and_capture(&mut media, &mut surface, job).await?;
/// println!("captured {} bytes", frame.len());
/// # Ok(())
/// # }
/// ```
pub async fn seek_and_capture<M: MediaHandle>(
    media: &mut M,
    surface: &mut CaptureSurface,
    job: CaptureJob,
) -> Result<EncodedFrame, Error> {
    log::debug!(
        "Seek-and-capture at {:?} ({}x{})",
        job.timestamp,
        job.target_width,
        job.target_height
    );

    media.seek(job.timestamp).await?;
    surface.capture(media, job.target_width, job.target_height)
}
