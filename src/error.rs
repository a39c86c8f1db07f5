//! Error types for the `framesift` crate.
//!
//! This module defines [`Error`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to diagnose
//! the problem without additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf, time::Duration};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error as ThisError;

/// The unified error type for all `framesift` operations.
///
/// Every public method that can fail returns `Result<T, Error>`.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The media resource was torn down before a seek's readiness signal
    /// fired. Distinguishes a dead decoder from one that is merely slow.
    #[error("Capture stalled: media resource went away before the frame was ready")]
    CaptureStalled,

    /// A capture was attempted before any frame had been decoded.
    #[error("No frame has been decoded yet")]
    NoFrameDecoded,

    /// A sampling interval of zero was provided.
    #[error("Sampling interval must be greater than zero")]
    InvalidInterval,

    /// A selection referenced a timestamp with no corresponding thumbnail.
    #[error("No thumbnail exists at timestamp {0:?}")]
    UnknownTimestamp(Duration),

    /// A gallery operation requires a loaded media resource.
    #[error("No media has been loaded")]
    NoMediaLoaded,

    /// Export was attempted while thumbnail sampling is still in flight.
    ///
    /// The decode position is shared; the two operations must never run
    /// against the same media resource concurrently.
    #[error("Cannot export while thumbnail sampling is in progress")]
    SamplingInProgress,

    /// Export was attempted with an empty selection ledger.
    #[error("Nothing selected: the selection ledger is empty")]
    EmptySelection,

    /// The external document builder rejected the export bundle.
    #[error("Document build failed: {0}")]
    DocumentBuild(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during capture encoding.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for Error {
    fn from(error: FfmpegError) -> Self {
        Error::FfmpegError(error.to_string())
    }
}
