//! Export compilation.
//!
//! [`compile_export`] re-drives the seek-and-capture primitive once per
//! ledger entry, at the media's natural resolution, and collects the results
//! into an [`ExportBundle`] in ledger (insertion) order. Nothing is reused
//! from the thumbnail pass: full-resolution rasters are always re-decoded,
//! trading repeat CPU work for never holding two representations per frame.
//!
//! [`export_to_document`] is the one-call orchestration: compile the bundle,
//! hand it to the external [`DocumentBuilder`](crate::DocumentBuilder), and
//! save the resulting blob through a [`FileSink`](crate::FileSink).

use std::path::PathBuf;
use std::time::Duration;

use crate::capture::{CaptureJob, seek_and_capture};
use crate::document::{DocumentBuilder, FileSink, suggested_filename};
use crate::error::Error;
use crate::ledger::SelectionLedger;
use crate::media::MediaHandle;
use crate::options::CaptureOptions;
use crate::progress::{OperationType, ProgressTracker};
use crate::surface::{CaptureSurface, EncodedFrame};

/// One full-resolution capture destined for the exported document.
#[derive(Debug, Clone)]
pub struct ExportFrame {
    /// The ledger timestamp this frame was captured at.
    pub timestamp: Duration,
    /// Full-resolution encoded capture.
    pub image: EncodedFrame,
}

/// The ordered set of full-resolution captures handed to document building.
///
/// One frame per ledger entry, in ledger (insertion) order. Constructed
/// fresh per export and handed off, never retained.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    frames: Vec<ExportFrame>,
}

impl ExportBundle {
    /// Number of frames in the bundle.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the bundle holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frames in export order.
    pub fn frames(&self) -> &[ExportFrame] {
        &self.frames
    }

    /// Iterate over the frames in export order.
    pub fn iter(&self) -> impl Iterator<Item = &ExportFrame> {
        self.frames.iter()
    }
}

impl<'a> IntoIterator for &'a ExportBundle {
    type Item = &'a ExportFrame;
    type IntoIter = std::slice::Iter<'a, ExportFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Re-capture every ledger entry at full resolution, in ledger order.
///
/// Captures run strictly one at a time against the shared decode position,
/// and deliberately in insertion order rather than timeline order, because
/// the export document presents frames in the order the user chose them.
///
/// # Errors
///
/// - [`Error::EmptySelection`] if the ledger is empty; the media is never
///   touched and no partial bundle exists.
/// - [`Error::Cancelled`] if the options' token is cancelled mid-batch.
/// - Any capture error; the batch is all-or-nothing and is not retried.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framesift::{CaptureOptions, CaptureSurface, SelectionLedger, VideoFile, compile_export};
///
/// # async fn example() -> Result<(), framesift::Error> {
/// let mut media = VideoFile::open("input.mp4")?;
/// let mut surface = CaptureSurface::new();
///
/// let mut ledger = SelectionLedger::new();
/// ledger.add(Duration::from_secs(2));
/// ledger.add(Duration::from_secs(0));
///
/// let bundle = compile_export(&mut media, &mut surface, &ledger, &CaptureOptions::new()).await?;
/// assert_eq!(bundle.len(), 2);
/// # Ok(())
/// # }
/// ```
pub async fn compile_export<M: MediaHandle>(
    media: &mut M,
    surface: &mut CaptureSurface,
    ledger: &SelectionLedger,
    options: &CaptureOptions,
) -> Result<ExportBundle, Error> {
    if ledger.is_empty() {
        return Err(Error::EmptySelection);
    }

    let width = media.natural_width();
    let height = media.natural_height();

    log::info!(
        "Compiling export: {} frames at {}x{}",
        ledger.len(),
        width,
        height,
    );

    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::ExportCompilation,
        Some(ledger.len() as u64),
        options.batch_size,
    );

    let mut frames = Vec::with_capacity(ledger.len());
    for &timestamp in ledger.ordered_timestamps() {
        if options.is_cancelled() {
            log::debug!("Export cancelled at {timestamp:?}");
            return Err(Error::Cancelled);
        }

        let job = CaptureJob::new(timestamp, width, height);
        let image = seek_and_capture(media, surface, job).await?;
        frames.push(ExportFrame { timestamp, image });

        tracker.advance(Some(timestamp));
    }

    tracker.finish();
    Ok(ExportBundle { frames })
}

/// Compile the ledger into a document and save it.
///
/// Runs [`compile_export`], hands the bundle to `builder`, and writes the
/// resulting blob through `sink` under a
/// [`suggested_filename`](crate::suggested_filename) carrying the builder's
/// extension. Returns the saved path.
///
/// # Errors
///
/// Everything [`compile_export`] can return, plus
/// [`Error::DocumentBuild`] from the builder and I/O errors from the sink.
pub async fn export_to_document<M, B, S>(
    media: &mut M,
    surface: &mut CaptureSurface,
    ledger: &SelectionLedger,
    builder: &B,
    sink: &S,
    options: &CaptureOptions,
) -> Result<PathBuf, Error>
where
    M: MediaHandle,
    B: DocumentBuilder,
    S: FileSink,
{
    let bundle = compile_export(media, surface, ledger, options).await?;
    let blob = builder.build(&bundle)?;
    let filename = suggested_filename(builder.extension());
    let path = sink.save(&blob, &filename)?;

    log::info!(
        "Exported {} frames ({} bytes) to {}",
        bundle.len(),
        blob.len(),
        path.display(),
    );
    Ok(path)
}
