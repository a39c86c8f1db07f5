//! FFmpeg-backed [`MediaHandle`] implementation.
//!
//! [`VideoFile`] opens a media file and owns a dedicated decode worker
//! thread. The worker holds the FFmpeg demuxer (the single decode position)
//! and serves seek commands one at a time: seek the container to the nearest
//! keyframe before the target, decode forward until the target frame is
//! reached, scale it to RGB at natural resolution, publish it as the current
//! frame, and fire the seek's one-shot readiness signal.
//!
//! Dropping the `VideoFile` closes the command channel; the worker exits at
//! the next command boundary, and any still-pending [`FrameReady`] resolves
//! with [`Error::CaptureStalled`](crate::Error::CaptureStalled).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::Error;
use crate::media::{FrameReady, MediaHandle, ReadySignal, clamp_position};

/// Metadata extracted when a [`VideoFile`] is opened.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Container-level duration.
    pub duration: Duration,
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Average frame rate.
    pub frames_per_second: f64,
    /// Video codec name.
    pub codec: String,
    /// Container format name.
    pub format: String,
}

/// One seek request for the decode worker.
struct SeekCommand {
    target: Duration,
    signal: ReadySignal,
}

/// An FFmpeg-backed, seekable video resource.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framesift::{MediaHandle, VideoFile};
///
/// # async fn example() -> Result<(), framesift::Error> {
/// let mut media = VideoFile::open("input.mp4")?;
/// println!(
///     "{}x{}, {:.2}s",
///     media.natural_width(),
///     media.natural_height(),
///     media.duration().as_secs_f64(),
/// );
///
/// media.seek(Duration::from_secs(5)).await?;
/// let frame = media.current_frame().expect("frame was just decoded");
/// # Ok(())
/// # }
/// ```
pub struct VideoFile {
    info: VideoInfo,
    path: PathBuf,
    commands: mpsc::Sender<SeekCommand>,
    frame_slot: Arc<Mutex<Option<RgbImage>>>,
    #[allow(dead_code)]
    worker: JoinHandle<()>,
}

impl VideoFile {
    /// Open a video file and spawn its decode worker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileOpen`] if the file cannot be opened and
    /// [`Error::NoVideoStream`] if it contains no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening media file: {}", path.display());

        let frame_slot = Arc::new(Mutex::new(None));
        let (command_sender, command_receiver) = mpsc::channel();
        let (info_sender, info_receiver) = mpsc::channel();

        let worker_path = path.clone();
        let worker_slot = Arc::clone(&frame_slot);
        let worker = thread::Builder::new()
            .name("framesift-decode".to_string())
            .spawn(move || decode_worker(worker_path, worker_slot, info_sender, command_receiver))?;

        let info = info_receiver
            .recv()
            .map_err(|_| Error::FileOpen {
                path: path.clone(),
                reason: "decode worker terminated during open".to_string(),
            })??;

        log::info!(
            "Opened media file: {} (format={}, duration={:.2}s, {}x{}, {:.2} fps, codec={})",
            path.display(),
            info.format,
            info.duration.as_secs_f64(),
            info.width,
            info.height,
            info.frames_per_second,
            info.codec,
        );

        Ok(Self {
            info,
            path,
            commands: command_sender,
            frame_slot,
            worker,
        })
    }

    /// Metadata extracted at open time.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MediaHandle for VideoFile {
    fn duration(&self) -> Duration {
        self.info.duration
    }

    fn natural_width(&self) -> u32 {
        self.info.width
    }

    fn natural_height(&self) -> u32 {
        self.info.height
    }

    fn seek(&mut self, position: Duration) -> FrameReady {
        let target = clamp_position(position, self.info.duration);
        log::debug!("Seeking {} to {target:?}", self.path.display());

        let (signal, ready) = FrameReady::channel();
        // A failed send returns (and drops) the command, signal included;
        // the dropped signal resolves `ready` with CaptureStalled.
        let _ = self.commands.send(SeekCommand { target, signal });
        ready
    }

    fn current_frame(&self) -> Option<RgbImage> {
        self.frame_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Decode worker entry point. Owns all FFmpeg state for one file.
fn decode_worker(
    path: PathBuf,
    frame_slot: Arc<Mutex<Option<RgbImage>>>,
    info_sender: mpsc::Sender<Result<VideoInfo, Error>>,
    commands: mpsc::Receiver<SeekCommand>,
) {
    let mut state = match DecodeState::open(&path) {
        Ok(state) => {
            let _ = info_sender.send(Ok(state.info.clone()));
            state
        }
        Err(error) => {
            let _ = info_sender.send(Err(error));
            return;
        }
    };

    while let Ok(SeekCommand { target, signal }) = commands.recv() {
        match state.decode_at(target) {
            Ok(image) => {
                *frame_slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(image);
                signal.notify();
            }
            Err(error) => {
                log::warn!(
                    "Decode at {target:?} failed for {}: {error}",
                    path.display(),
                );
                signal.fail(error);
            }
        }
    }

    log::debug!("Decode worker for {} shutting down", path.display());
}

/// FFmpeg demuxer state held by the worker thread.
struct DecodeState {
    input: Input,
    stream_index: usize,
    info: VideoInfo,
}

impl DecodeState {
    /// Initialise FFmpeg (idempotent), open the file, locate the best video
    /// stream, and extract its metadata.
    fn open(path: &Path) -> Result<Self, Error> {
        ffmpeg_next::init().map_err(|error| Error::FileOpen {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| Error::FileOpen {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or(Error::NoVideoStream)?;
        let stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                Error::FileOpen {
                    path: path.to_path_buf(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| Error::FileOpen {
                path: path.to_path_buf(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        // Average frame rate, falling back to the stream's rate field.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let info = VideoInfo {
            duration,
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            codec,
            format: input.format().name().to_string(),
        };

        Ok(Self {
            input,
            stream_index,
            info,
        })
    }

    /// Seek to the nearest keyframe before `target` and decode forward until
    /// the target frame is reached. Returns the frame scaled to RGB24 at
    /// natural resolution.
    fn decode_at(&mut self, target: Duration) -> Result<RgbImage, Error> {
        let stream = self
            .input
            .stream(self.stream_index)
            .ok_or(Error::NoVideoStream)?;
        let time_base = stream.time_base();
        let codec_parameters = stream.parameters();

        // Fresh decoder per seek: cheap relative to decoding, and it never
        // carries reference frames across container-level seeks.
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let mut decoder = decoder_context.decoder().video()?;

        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            self.info.width,
            self.info.height,
            ScalingFlags::BILINEAR,
        )?;

        // Container-level seeks take AV_TIME_BASE (microsecond) timestamps.
        let seek_timestamp = target.as_micros() as i64;
        self.input.seek(seek_timestamp, ..seek_timestamp)?;

        let target_frame = timestamp_to_frame_number(target, self.info.frames_per_second);
        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in self.input.packets() {
            if stream.index() != self.stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                let pts = decoded_frame.pts().unwrap_or(0);
                if reached_target(pts, time_base, self.info.frames_per_second, target, target_frame)
                {
                    scaler.run(&decoded_frame, &mut rgb_frame)?;
                    return frame_to_rgb_image(&rgb_frame, self.info.width, self.info.height);
                }
            }
        }

        // Flush the decoder for frames buffered near EOF.
        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.pts().unwrap_or(0);
            if reached_target(pts, time_base, self.info.frames_per_second, target, target_frame) {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                return frame_to_rgb_image(&rgb_frame, self.info.width, self.info.height);
            }
        }

        Err(Error::VideoDecodeError(format!(
            "Could not locate a frame at {target:?} in the video stream"
        )))
    }
}

/// Whether a decoded frame at `pts` is at or past the seek target.
fn reached_target(
    pts: i64,
    time_base: ffmpeg_next::Rational,
    frames_per_second: f64,
    target: Duration,
    target_frame: u64,
) -> bool {
    let seconds = pts_to_seconds(pts, time_base);
    if frames_per_second > 0.0 {
        (seconds * frames_per_second) as u64 >= target_frame
    } else {
        seconds >= target.as_secs_f64()
    }
}

/// Rescale a PTS value from stream time base to seconds.
fn pts_to_seconds(pts: i64, time_base: ffmpeg_next::Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Convert a timestamp to a frame number using the video's frame rate.
fn timestamp_to_frame_number(timestamp: Duration, frames_per_second: f64) -> u64 {
    (timestamp.as_secs_f64() * frames_per_second) as u64
}

/// Copy a scaled RGB24 frame into an [`RgbImage`], honouring row stride.
fn frame_to_rgb_image(rgb_frame: &VideoFrame, width: u32, height: u32) -> Result<RgbImage, Error> {
    let stride = rgb_frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = rgb_frame.data(0);

    let buffer = if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    };

    RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        Error::VideoDecodeError("Failed to construct RGB image from decoded frame data".to_string())
    })
}

/// FFmpeg internal log verbosity.
///
/// FFmpeg has its own logging system, separate from the Rust
/// [`log`](https://crates.io/crates/log) facade; by default it prints
/// warnings to stderr. This controls that console output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderLogLevel {
    /// Print no output at all.
    Quiet,
    /// Log recoverable errors only.
    Error,
    /// Log warnings (FFmpeg's default).
    Warning,
    /// Log informational messages.
    Info,
    /// Log debugging messages.
    Debug,
}

impl DecoderLogLevel {
    /// Parse a level name as used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "quiet" => Some(Self::Quiet),
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

/// Set FFmpeg's internal log verbosity.
///
/// Does **not** affect Rust-side `log` output; configure that with a normal
/// `log` subscriber.
pub fn set_decoder_log_level(level: DecoderLogLevel) {
    use ffmpeg_next::util::log::Level;

    let level = match level {
        DecoderLogLevel::Quiet => Level::Quiet,
        DecoderLogLevel::Error => Level::Error,
        DecoderLogLevel::Warning => Level::Warning,
        DecoderLogLevel::Info => Level::Info,
        DecoderLogLevel::Debug => Level::Debug,
    };
    ffmpeg_next::util::log::set_level(level);
}
