//! The reusable off-screen capture surface.
//!
//! [`CaptureSurface`] owns a persistent RGB bitmap buffer that media frames
//! are scaled into, plus the JPEG encoding step that turns the buffer into a
//! transportable [`EncodedFrame`]. The buffer survives across captures and is
//! only reallocated when the requested dimensions change, so driving a whole
//! thumbnail timeline through one surface costs a single allocation.

use image::{Rgb, RgbImage, codecs::jpeg::JpegEncoder, imageops};

use crate::error::Error;
use crate::media::MediaHandle;

/// Default JPEG quality for encoded captures (1–100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// An encoded still image produced by a capture.
///
/// Immutable once created. `data` holds the JPEG byte stream; `width` and
/// `height` are the raster dimensions the frame was captured at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// JPEG-encoded image bytes.
    pub data: Vec<u8>,
}

impl EncodedFrame {
    /// Size of the encoded representation in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the encoded representation is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A reusable off-screen raster buffer with a JPEG encoding step.
///
/// # Example
///
/// ```no_run
/// use framesift::{CaptureSurface, MediaHandle, VideoFile};
///
/// # async fn example() -> Result<(), framesift::Error> {
/// let mut media = VideoFile::open("input.mp4")?;
/// let mut surface = CaptureSurface::new();
///
/// media.seek(std::time::Duration::from_secs(3)).await?;
/// let frame = surface.capture(&media, 480, 270)?;
/// std::fs::write("frame.jpg", &frame.data)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CaptureSurface {
    /// Persistent bitmap buffer; `None` until the first capture.
    buffer: Option<RgbImage>,
    jpeg_quality: u8,
}

impl CaptureSurface {
    /// Create a surface with the default JPEG quality.
    pub fn new() -> Self {
        Self {
            buffer: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Create a surface with a specific JPEG quality (clamped to 1–100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            buffer: None,
            jpeg_quality: quality.clamp(1, 100),
        }
    }

    /// The JPEG quality used for encoding.
    pub fn quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Scale the media's current frame into the internal buffer at
    /// `(width, height)` and encode it as JPEG.
    ///
    /// The frame is scaled, never cropped. The internal buffer is reused
    /// across calls and reallocated only when the dimensions change. Safe to
    /// call repeatedly; the surface has no other side effects.
    ///
    /// # Errors
    ///
    /// - [`Error::NoFrameDecoded`] if the media has no decoded frame yet.
    /// - [`Error::ImageError`] if JPEG encoding fails.
    pub fn capture<M: MediaHandle>(
        &mut self,
        media: &M,
        width: u32,
        height: u32,
    ) -> Result<EncodedFrame, Error> {
        let source = media.current_frame().ok_or(Error::NoFrameDecoded)?;

        let width = width.max(1);
        let height = height.max(1);

        let buffer = match &mut self.buffer {
            Some(buffer) if buffer.width() == width && buffer.height() == height => buffer,
            slot => {
                log::debug!("Resizing capture surface buffer to {width}x{height}");
                slot.insert(RgbImage::new(width, height))
            }
        };

        fill_scaled(&source, buffer);

        let mut data = Vec::new();
        buffer.write_with_encoder(JpegEncoder::new_with_quality(&mut data, self.jpeg_quality))?;

        Ok(EncodedFrame {
            width,
            height,
            data,
        })
    }
}

impl Default for CaptureSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale `source` into `target`, overwriting every pixel of the target.
///
/// Writes in place so the target's allocation is preserved. Same-size
/// sources are copied row-for-row; everything else is bilinearly sampled.
fn fill_scaled(source: &RgbImage, target: &mut RgbImage) {
    let (tw, th) = (target.width(), target.height());

    if source.width() == tw && source.height() == th {
        target.copy_from_slice(source.as_raw());
        return;
    }

    for y in 0..th {
        // Sample at pixel centers in normalized [0, 1] coordinates.
        let v = (y as f32 + 0.5) / th as f32;
        for x in 0..tw {
            let u = (x as f32 + 0.5) / tw as f32;
            let pixel = imageops::sample_bilinear(source, u, v).unwrap_or(Rgb([0, 0, 0]));
            target.put_pixel(x, y, pixel);
        }
    }
}
