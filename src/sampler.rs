//! Thumbnail timeline sampling.
//!
//! [`sample`] drives the seek-and-capture primitive across the whole
//! timeline at a fixed interval, producing an ordered [`ThumbnailSequence`]
//! of low-resolution captures. Captures are strictly sequential: each seek
//! is awaited before the next is issued, because the media handle has a
//! single decode position.

use std::time::Duration;

use crate::capture::{CaptureJob, seek_and_capture};
use crate::error::Error;
use crate::media::MediaHandle;
use crate::options::CaptureOptions;
use crate::progress::{OperationType, ProgressTracker};
use crate::surface::{CaptureSurface, EncodedFrame};

/// A single sampled frame: its timeline position and its encoded raster.
///
/// Immutable once created; produced only by the sampler.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// Position on the media timeline this frame was captured at.
    pub timestamp: Duration,
    /// Low-resolution encoded capture.
    pub image: EncodedFrame,
}

/// An ordered sequence of thumbnails, strictly increasing by timestamp.
///
/// Created fresh by every [`sample`] run; a gallery discards the previous
/// sequence whenever new media is loaded.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailSequence {
    entries: Vec<Thumbnail>,
}

impl ThumbnailSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of thumbnails in the sequence.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sequence holds no thumbnails.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The thumbnail at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Thumbnail> {
        self.entries.get(index)
    }

    /// Iterate over the thumbnails in timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = &Thumbnail> {
        self.entries.iter()
    }

    /// Whether some thumbnail was sampled at exactly `timestamp`.
    pub fn contains_timestamp(&self, timestamp: Duration) -> bool {
        self.entries
            .iter()
            .any(|thumbnail| thumbnail.timestamp == timestamp)
    }

    /// All sampled timestamps, in order.
    pub fn timestamps(&self) -> impl Iterator<Item = Duration> + '_ {
        self.entries.iter().map(|thumbnail| thumbnail.timestamp)
    }

    fn push(&mut self, thumbnail: Thumbnail) {
        debug_assert!(
            self.entries
                .last()
                .is_none_or(|last| last.timestamp < thumbnail.timestamp),
            "thumbnail timestamps must be strictly increasing",
        );
        self.entries.push(thumbnail);
    }
}

impl<'a> IntoIterator for &'a ThumbnailSequence {
    type Item = &'a Thumbnail;
    type IntoIter = std::slice::Iter<'a, Thumbnail>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Sample the media timeline into an ordered thumbnail sequence.
///
/// Captures one thumbnail per `interval`, at timestamps `0, interval,
/// 2·interval, …` strictly below the media duration: exactly
/// `ceil(duration / interval)` entries. Thumbnails are captured at the
/// natural resolution divided by
/// [`with_thumbnail_divisor`](CaptureOptions::with_thumbnail_divisor)
/// (quarter resolution by default).
///
/// Captures run strictly one at a time; the call resolves only once the
/// whole sequence is complete. A clip shorter than one interval still
/// yields its single representative frame at `t = 0`; zero-duration media
/// yields an empty sequence.
///
/// # Errors
///
/// - [`Error::InvalidInterval`] if `interval` is zero.
/// - [`Error::Cancelled`] if the options' token is cancelled mid-batch.
/// - Any capture error; the batch is all-or-nothing and is not retried.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framesift::{CaptureOptions, CaptureSurface, VideoFile, sample};
///
/// # async fn example() -> Result<(), framesift::Error> {
/// let mut media = VideoFile::open("input.mp4")?;
/// let mut surface = CaptureSurface::new();
///
/// let thumbnails = sample(
///     &mut media,
///     &mut surface,
///     Duration::from_secs(1),
///     &CaptureOptions::new(),
/// )
/// .await?;
/// println!("sampled {} thumbnails", thumbnails.len());
/// # Ok(())
/// # }
/// ```
pub async fn sample<M: MediaHandle>(
    media: &mut M,
    surface: &mut CaptureSurface,
    interval: Duration,
    options: &CaptureOptions,
) -> Result<ThumbnailSequence, Error> {
    let mut sequence = ThumbnailSequence::new();
    for_each_thumbnail(media, surface, interval, options, |thumbnail| {
        sequence.push(thumbnail);
        Ok(())
    })
    .await?;
    Ok(sequence)
}

/// Sample the timeline, delivering each thumbnail to `handler` as soon as it
/// is captured instead of collecting them.
///
/// This is the streaming alternative to [`sample`] for hosts that render
/// thumbnails incrementally. Sampling stops at the first handler error.
///
/// # Errors
///
/// Same as [`sample`], plus the first error returned by the handler.
pub async fn for_each_thumbnail<M, F>(
    media: &mut M,
    surface: &mut CaptureSurface,
    interval: Duration,
    options: &CaptureOptions,
    mut handler: F,
) -> Result<(), Error>
where
    M: MediaHandle,
    F: FnMut(Thumbnail) -> Result<(), Error>,
{
    if interval.is_zero() {
        return Err(Error::InvalidInterval);
    }

    let duration = media.duration();
    let divisor = options.thumbnail_divisor.max(1);
    let target_width = (media.natural_width() / divisor).max(1);
    let target_height = (media.natural_height() / divisor).max(1);

    let expected = expected_count(duration, interval);

    log::info!(
        "Sampling timeline: duration={:.2}s, interval={:.2}s, {} thumbnails at {}x{}",
        duration.as_secs_f64(),
        interval.as_secs_f64(),
        expected,
        target_width,
        target_height,
    );

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::ThumbnailSampling,
        Some(expected),
        options.batch_size,
    );

    let mut timestamp = Duration::ZERO;
    while timestamp < duration {
        if options.is_cancelled() {
            log::debug!("Sampling cancelled at {timestamp:?}");
            return Err(Error::Cancelled);
        }

        let job = CaptureJob::new(timestamp, target_width, target_height);
        let image = seek_and_capture(media, surface, job).await?;
        handler(Thumbnail { timestamp, image })?;

        tracker.advance(Some(timestamp));
        timestamp += interval;
    }

    tracker.finish();
    log::debug!("Sampling complete");
    Ok(())
}

/// Number of thumbnails a full sampling run will produce:
/// `ceil(duration / interval)`.
fn expected_count(duration: Duration, interval: Duration) -> u64 {
    if interval.is_zero() {
        return 0;
    }
    (duration.as_secs_f64() / interval.as_secs_f64()).ceil() as u64
}
