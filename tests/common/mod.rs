//! Shared test doubles for the pipeline tests.
//!
//! [`SyntheticMedia`] is an in-memory [`MediaHandle`] whose frames are solid
//! colours derived from the seek position, so a decoded capture can be traced
//! back to the timestamp it was taken at. It also records every seek, which
//! lets tests assert the strictly-sequential seek ordering.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use framesift::{FrameReady, MediaHandle, clamp_position};
use image::{Rgb, RgbImage};

/// Shade encoding: one grey step per 10 seconds keeps shades far enough
/// apart to survive JPEG round-trips.
pub fn shade_for(position: Duration) -> u8 {
    (position.as_secs() * 10 % 256) as u8
}

/// An in-memory media resource with deterministic frames.
pub struct SyntheticMedia {
    duration: Duration,
    width: u32,
    height: u32,
    position: Option<Duration>,
    seeks: Arc<Mutex<Vec<Duration>>>,
}

impl SyntheticMedia {
    pub fn new(duration: Duration, width: u32, height: u32) -> Self {
        Self {
            duration,
            width,
            height,
            position: None,
            seeks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every seek issued against this media, in order.
    pub fn seek_log(&self) -> Vec<Duration> {
        self.seeks.lock().unwrap().clone()
    }
}

impl MediaHandle for SyntheticMedia {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn natural_width(&self) -> u32 {
        self.width
    }

    fn natural_height(&self) -> u32 {
        self.height
    }

    fn seek(&mut self, position: Duration) -> FrameReady {
        let position = clamp_position(position, self.duration);
        self.seeks.lock().unwrap().push(position);
        self.position = Some(position);

        let (signal, ready) = FrameReady::channel();
        signal.notify();
        ready
    }

    fn current_frame(&self) -> Option<RgbImage> {
        self.position.map(|position| {
            let shade = shade_for(position);
            RgbImage::from_pixel(self.width, self.height, Rgb([shade, shade, shade]))
        })
    }
}

/// A media resource that is torn down mid-seek: the readiness signal is
/// dropped without ever firing.
pub struct StalledMedia {
    duration: Duration,
}

impl StalledMedia {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl MediaHandle for StalledMedia {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn natural_width(&self) -> u32 {
        640
    }

    fn natural_height(&self) -> u32 {
        480
    }

    fn seek(&mut self, _position: Duration) -> FrameReady {
        let (signal, ready) = FrameReady::channel();
        drop(signal);
        ready
    }

    fn current_frame(&self) -> Option<RgbImage> {
        None
    }
}

/// Decode a JPEG capture and return the shade of its top-left pixel.
pub fn decoded_shade(data: &[u8]) -> u8 {
    let image = image::load_from_memory(data).expect("capture should be a valid JPEG");
    image.to_rgb8().get_pixel(0, 0)[0]
}

/// Decode a JPEG capture and return its dimensions.
pub fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
    let image = image::load_from_memory(data).expect("capture should be a valid JPEG");
    (image.width(), image.height())
}

/// Whether two JPEG-round-tripped shades are close enough to be the same
/// source colour.
pub fn shades_match(actual: u8, expected: u8) -> bool {
    actual.abs_diff(expected) <= 4
}
