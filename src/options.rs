//! Capture batch configuration.
//!
//! [`CaptureOptions`] is a builder that threads progress callbacks,
//! cancellation tokens, and tuning settings through the sampler and the
//! export compiler without polluting every function signature.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framesift::{CancellationToken, CaptureOptions, ProgressCallback, ProgressInfo};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = CaptureOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone())
//!     .with_thumbnail_divisor(4);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Default linear scale divisor applied to thumbnail captures.
///
/// A 1920×1080 video yields 480×270 thumbnails.
pub const DEFAULT_THUMBNAIL_DIVISOR: u32 = 4;

/// Configuration for sampling and export batches.
///
/// Carries optional progress-, cancellation-, and tuning-related settings.
/// A default-constructed value behaves like the plain API: no progress, no
/// cancellation, quarter-resolution thumbnails.
#[derive(Clone)]
pub struct CaptureOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N captures).
    /// Defaults to 1 (every capture).
    pub(crate) batch_size: u64,
    /// Linear divisor applied to the natural resolution for thumbnails.
    pub(crate) thumbnail_divisor: u32,
}

impl Debug for CaptureOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CaptureOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .field("thumbnail_divisor", &self.thumbnail_divisor)
            .finish()
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureOptions {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
            thumbnail_divisor: DEFAULT_THUMBNAIL_DIVISOR,
        }
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked every
    /// [`batch_size`](CaptureOptions::with_batch_size) captures.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, the capture loop stops at the next frame
    /// boundary and returns [`Error::Cancelled`](crate::Error::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every capture; 10 means every 10th capture.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the linear divisor applied to the natural resolution when
    /// capturing thumbnails. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_thumbnail_divisor(mut self, divisor: u32) -> Self {
        self.thumbnail_divisor = divisor.max(1);
        self
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
