//! The gallery session.
//!
//! [`Gallery`] is the host-side state machine that glues the pipeline
//! together: it owns the current media handle, the capture surface, the
//! thumbnail sequence, and the selection ledger, and it enforces the two
//! lifecycle rules the lower layers cannot:
//!
//! - loading new media invalidates everything derived from the old one
//!   (thumbnails, selections, highlight) and cancels any batch still in
//!   flight against it;
//! - sampling and export never run against the same media concurrently.

use std::path::PathBuf;
use std::time::Duration;

use crate::document::{DocumentBuilder, FileSink};
use crate::error::Error;
use crate::export::export_to_document;
use crate::ledger::SelectionLedger;
use crate::media::MediaHandle;
use crate::options::CaptureOptions;
use crate::progress::CancellationToken;
use crate::sampler::{ThumbnailSequence, sample};
use crate::surface::CaptureSurface;

/// Host-side session state for one video at a time.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framesift::{DirectorySink, Gallery, VideoFile, ZipDocumentBuilder};
///
/// # async fn example() -> Result<(), framesift::Error> {
/// let mut gallery = Gallery::new();
/// gallery.load_media(VideoFile::open("input.mp4")?);
/// gallery.sample(Duration::from_secs(1)).await?;
///
/// gallery.select(Duration::from_secs(1))?;
/// gallery.select(Duration::from_secs(3))?;
///
/// let saved = gallery
///     .export(&ZipDocumentBuilder::new(), &DirectorySink::new("exports"))
///     .await?;
/// println!("wrote {}", saved.display());
/// # Ok(())
/// # }
/// ```
pub struct Gallery<M: MediaHandle> {
    media: Option<M>,
    surface: CaptureSurface,
    thumbnails: ThumbnailSequence,
    ledger: SelectionLedger,
    options: CaptureOptions,
    cancellation: CancellationToken,
    sampling: bool,
}

impl<M: MediaHandle> Gallery<M> {
    /// Create an empty gallery with default options.
    pub fn new() -> Self {
        Self::with_options(CaptureOptions::new())
    }

    /// Create an empty gallery with specific capture options.
    ///
    /// Any cancellation token on `options` is superseded by the gallery's
    /// own per-load token.
    pub fn with_options(options: CaptureOptions) -> Self {
        Self {
            media: None,
            surface: CaptureSurface::new(),
            thumbnails: ThumbnailSequence::new(),
            ledger: SelectionLedger::new(),
            options,
            cancellation: CancellationToken::new(),
            sampling: false,
        }
    }

    /// Replace the gallery's capture surface, e.g. to change JPEG quality.
    #[must_use]
    pub fn with_surface(mut self, surface: CaptureSurface) -> Self {
        self.surface = surface;
        self
    }

    /// Install a new media handle, invalidating all state derived from the
    /// previous one.
    ///
    /// Cancels the previous load's token so any batch another task still has
    /// in flight against the old media aborts with
    /// [`Error::Cancelled`](crate::Error::Cancelled) instead of being
    /// silently orphaned, then clears the thumbnail sequence and the ledger.
    pub fn load_media(&mut self, media: M) {
        log::info!("Loading new media; clearing thumbnails and selection");
        self.cancellation.cancel();
        self.cancellation = CancellationToken::new();
        self.thumbnails = ThumbnailSequence::new();
        self.ledger.clear();
        self.sampling = false;
        self.media = Some(media);
    }

    /// Drop the current media handle and all derived state.
    pub fn unload_media(&mut self) {
        self.cancellation.cancel();
        self.cancellation = CancellationToken::new();
        self.thumbnails = ThumbnailSequence::new();
        self.ledger.clear();
        self.sampling = false;
        self.media = None;
    }

    /// Sample the loaded media into the gallery's thumbnail sequence.
    ///
    /// Raises the sampling flag for the duration of the run; collaborators
    /// observe it through [`is_sampling`](Gallery::is_sampling) and exports
    /// are refused while it is up.
    ///
    /// Returns the number of thumbnails sampled.
    ///
    /// # Errors
    ///
    /// [`Error::NoMediaLoaded`] without media, otherwise anything
    /// [`sample`](crate::sample) can return. On error the previous
    /// thumbnail sequence is left cleared, not half-replaced.
    pub async fn sample(&mut self, interval: Duration) -> Result<usize, Error> {
        let media = self.media.as_mut().ok_or(Error::NoMediaLoaded)?;
        let options = self
            .options
            .clone()
            .with_cancellation(self.cancellation.clone());

        self.thumbnails = ThumbnailSequence::new();
        self.sampling = true;
        let result = sample(media, &mut self.surface, interval, &options).await;
        self.sampling = false;

        let sequence = result?;
        let count = sequence.len();
        self.thumbnails = sequence;
        Ok(count)
    }

    /// Select the thumbnail at `timestamp` and highlight it.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTimestamp`] if no thumbnail was sampled at that
    /// exact timestamp.
    pub fn select(&mut self, timestamp: Duration) -> Result<(), Error> {
        if !self.thumbnails.contains_timestamp(timestamp) {
            return Err(Error::UnknownTimestamp(timestamp));
        }
        self.ledger.add(timestamp);
        self.ledger.highlight(timestamp);
        Ok(())
    }

    /// Deselect `timestamp`. A no-op if it was not selected.
    pub fn deselect(&mut self, timestamp: Duration) {
        self.ledger.remove(timestamp);
    }

    /// Toggle the selection state of the thumbnail at `timestamp`.
    ///
    /// Returns `true` if the timestamp is selected afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTimestamp`] if no thumbnail was sampled at that
    /// exact timestamp.
    pub fn toggle(&mut self, timestamp: Duration) -> Result<bool, Error> {
        if self.ledger.contains(timestamp) {
            self.ledger.remove(timestamp);
            Ok(false)
        } else {
            self.select(timestamp)?;
            Ok(true)
        }
    }

    /// Compile the current selection into a document and save it.
    ///
    /// # Errors
    ///
    /// - [`Error::SamplingInProgress`] while the sampling flag is up; the
    ///   decode position must not be fought over.
    /// - [`Error::NoMediaLoaded`] without media.
    /// - Anything [`export_to_document`](crate::export_to_document) can
    ///   return, notably [`Error::EmptySelection`].
    pub async fn export<B, S>(&mut self, builder: &B, sink: &S) -> Result<PathBuf, Error>
    where
        B: DocumentBuilder,
        S: FileSink,
    {
        if self.sampling {
            return Err(Error::SamplingInProgress);
        }
        let media = self.media.as_mut().ok_or(Error::NoMediaLoaded)?;
        let options = self
            .options
            .clone()
            .with_cancellation(self.cancellation.clone());

        export_to_document(
            media,
            &mut self.surface,
            &self.ledger,
            builder,
            sink,
            &options,
        )
        .await
    }

    /// The sampled thumbnail sequence for the current media.
    pub fn thumbnails(&self) -> &ThumbnailSequence {
        &self.thumbnails
    }

    /// The selection ledger for the current media.
    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    /// The loaded media handle, if any.
    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// Whether a sampling run is currently in flight.
    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    /// A clone of the current load's cancellation token.
    ///
    /// Hosts hand this to other tasks so an in-flight batch can be aborted
    /// explicitly (it is also cancelled automatically by
    /// [`load_media`](Gallery::load_media)).
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }
}

impl<M: MediaHandle> Default for Gallery<M> {
    fn default() -> Self {
        Self::new()
    }
}
