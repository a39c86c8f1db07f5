//! # framesift
//!
//! Sample a video into an evenly-spaced thumbnail timeline, curate a
//! duplicate-free ordered selection of frames, and compile the selected
//! frames, re-captured at full resolution, into an exportable document.
//!
//! `framesift` is built around a single unit of work, the seek-and-capture
//! primitive: move the shared decode position, suspend until the frame at
//! that position is decoded, rasterize it through a reusable
//! [`CaptureSurface`], and encode it as JPEG. The
//! [thumbnail sampler](sample) and the [export compiler](compile_export)
//! both drive that primitive strictly sequentially, because a media resource
//! has exactly one decode position.
//!
//! ## Quick Start
//!
//! ### Sample a thumbnail timeline
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framesift::{CaptureOptions, CaptureSurface, VideoFile, sample};
//!
//! # async fn example() -> Result<(), framesift::Error> {
//! let mut media = VideoFile::open("input.mp4")?;
//! let mut surface = CaptureSurface::new();
//!
//! // One quarter-resolution thumbnail per second of video.
//! let thumbnails = sample(
//!     &mut media,
//!     &mut surface,
//!     Duration::from_secs(1),
//!     &CaptureOptions::new(),
//! )
//! .await?;
//!
//! for thumbnail in &thumbnails {
//!     println!("{:?}: {} bytes", thumbnail.timestamp, thumbnail.image.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Select frames and export a document
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framesift::{DirectorySink, Gallery, VideoFile, ZipDocumentBuilder};
//!
//! # async fn example() -> Result<(), framesift::Error> {
//! let mut gallery = Gallery::new();
//! gallery.load_media(VideoFile::open("input.mp4")?);
//! gallery.sample(Duration::from_secs(1)).await?;
//!
//! gallery.select(Duration::from_secs(2))?;
//! gallery.select(Duration::from_secs(0))?;
//! gallery.select(Duration::from_secs(5))?;
//!
//! // Full-resolution captures in selection order: 2s, 0s, 5s.
//! let saved = gallery
//!     .export(&ZipDocumentBuilder::new(), &DirectorySink::new("exports"))
//!     .await?;
//! println!("wrote {}", saved.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! - **One decode position, one writer.** All captures route through
//!   [`seek_and_capture`], which borrows the media handle mutably for the
//!   whole seek/await/capture cycle. Batches await each capture before
//!   issuing the next; sampling and export never overlap
//!   ([`Gallery`] refuses to export while sampling).
//! - **One-shot readiness.** [`MediaHandle::seek`] registers its readiness
//!   subscription before the position moves and the returned [`FrameReady`]
//!   consumes it exactly once, so a stale signal from an earlier seek can
//!   never resolve a later call.
//! - **No capture caching.** Exports re-decode every selected timestamp at
//!   full resolution rather than holding a second representation per frame.
//! - **Explicit teardown.** Replacing media cancels in-flight batches via
//!   [`CancellationToken`]; a torn-down media resource resolves pending
//!   seeks with [`Error::CaptureStalled`] instead of hanging forever.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system for the
//! [`VideoFile`] backend.

pub mod capture;
pub mod decode;
pub mod document;
pub mod error;
pub mod export;
pub mod ledger;
pub mod media;
pub mod options;
pub mod progress;
pub mod sampler;
pub mod session;
pub mod surface;

pub use capture::{CaptureJob, seek_and_capture};
pub use decode::{DecoderLogLevel, VideoFile, VideoInfo, set_decoder_log_level};
pub use document::{
    DirectorySink, DocumentBuilder, EXPORT_FILENAME_PREFIX, FileSink, ZipDocumentBuilder,
    suggested_filename,
};
pub use error::Error;
pub use export::{ExportBundle, ExportFrame, compile_export, export_to_document};
pub use ledger::SelectionLedger;
pub use media::{FrameReady, MediaHandle, ReadySignal, clamp_position};
pub use options::{CaptureOptions, DEFAULT_THUMBNAIL_DIVISOR};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use sampler::{Thumbnail, ThumbnailSequence, for_each_thumbnail, sample};
pub use session::Gallery;
pub use surface::{CaptureSurface, DEFAULT_JPEG_QUALITY, EncodedFrame};
