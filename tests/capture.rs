//! Seek-and-capture primitive and capture surface behaviour.

mod common;

use std::time::Duration;

use common::{StalledMedia, SyntheticMedia, decoded_dimensions};
use framesift::{
    CaptureJob, CaptureSurface, Error, FrameReady, MediaHandle, clamp_position, seek_and_capture,
};

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

// ── FrameReady ─────────────────────────────────────────────────────

#[tokio::test]
async fn ready_signal_resolves_the_future() {
    let (signal, ready) = FrameReady::channel();
    signal.notify();
    assert!(ready.await.is_ok());
}

#[tokio::test]
async fn dropped_signal_is_a_stall() {
    let (signal, ready) = FrameReady::channel();
    drop(signal);
    assert!(matches!(ready.await, Err(Error::CaptureStalled)));
}

#[tokio::test]
async fn failed_signal_carries_the_decode_error() {
    let (signal, ready) = FrameReady::channel();
    signal.fail(Error::VideoDecodeError("bad packet".to_string()));
    assert!(matches!(ready.await, Err(Error::VideoDecodeError(_))));
}

#[test]
fn clamp_position_bounds() {
    let duration = secs(10);
    assert_eq!(clamp_position(Duration::ZERO, duration), Duration::ZERO);
    assert_eq!(clamp_position(secs(4), duration), secs(4));
    assert_eq!(clamp_position(secs(99), duration), duration);
}

// ── CaptureSurface ─────────────────────────────────────────────────

#[test]
fn capture_without_a_decoded_frame_fails() {
    let media = SyntheticMedia::new(secs(10), 640, 480);
    let mut surface = CaptureSurface::new();

    let result = surface.capture(&media, 100, 100);
    assert!(matches!(result, Err(Error::NoFrameDecoded)));
}

#[tokio::test]
async fn capture_scales_to_the_requested_dimensions() {
    let mut media = SyntheticMedia::new(secs(10), 640, 480);
    media.seek(secs(1)).await.unwrap();

    let mut surface = CaptureSurface::new();
    let frame = surface.capture(&media, 100, 60).unwrap();

    assert_eq!((frame.width, frame.height), (100, 60));
    assert_eq!(decoded_dimensions(&frame.data), (100, 60));
    assert!(!frame.is_empty());
}

#[tokio::test]
async fn surface_is_reusable_across_dimension_changes() {
    let mut media = SyntheticMedia::new(secs(10), 640, 480);
    media.seek(secs(0)).await.unwrap();

    let mut surface = CaptureSurface::new();

    // Repeated same-size captures, then a resize, then back again.
    for _ in 0..3 {
        let frame = surface.capture(&media, 160, 120).unwrap();
        assert_eq!(decoded_dimensions(&frame.data), (160, 120));
    }
    let full = surface.capture(&media, 640, 480).unwrap();
    assert_eq!(decoded_dimensions(&full.data), (640, 480));
    let small = surface.capture(&media, 160, 120).unwrap();
    assert_eq!(decoded_dimensions(&small.data), (160, 120));
}

#[test]
fn quality_is_clamped() {
    assert_eq!(CaptureSurface::with_quality(0).quality(), 1);
    assert_eq!(CaptureSurface::with_quality(255).quality(), 100);
    assert_eq!(CaptureSurface::with_quality(80).quality(), 80);
}

// ── seek_and_capture ───────────────────────────────────────────────

#[tokio::test]
async fn seek_and_capture_round_trip() {
    let mut media = SyntheticMedia::new(secs(10), 640, 480);
    let mut surface = CaptureSurface::new();

    let job = CaptureJob::new(secs(7), 320, 240);
    let frame = seek_and_capture(&mut media, &mut surface, job).await.unwrap();

    assert_eq!(media.seek_log(), vec![secs(7)]);
    assert_eq!((frame.width, frame.height), (320, 240));
}

#[tokio::test]
async fn seek_past_duration_is_clamped() {
    let mut media = SyntheticMedia::new(secs(5), 640, 480);
    let mut surface = CaptureSurface::new();

    let job = CaptureJob::new(secs(60), 320, 240);
    seek_and_capture(&mut media, &mut surface, job).await.unwrap();

    assert_eq!(media.seek_log(), vec![secs(5)]);
}

#[tokio::test]
async fn recapture_at_a_new_resolution_reseeks() {
    // No caching across resolutions: the same timestamp is re-decoded.
    let mut media = SyntheticMedia::new(secs(10), 640, 480);
    let mut surface = CaptureSurface::new();

    let thumb = seek_and_capture(&mut media, &mut surface, CaptureJob::new(secs(2), 160, 120))
        .await
        .unwrap();
    let full = seek_and_capture(&mut media, &mut surface, CaptureJob::new(secs(2), 640, 480))
        .await
        .unwrap();

    assert_eq!(media.seek_log(), vec![secs(2), secs(2)]);
    assert_eq!((thumb.width, thumb.height), (160, 120));
    assert_eq!((full.width, full.height), (640, 480));
}

#[tokio::test]
async fn torn_down_media_stalls_the_capture() {
    let mut media = StalledMedia::new(secs(10));
    let mut surface = CaptureSurface::new();

    let job = CaptureJob::new(secs(1), 320, 240);
    let result = seek_and_capture(&mut media, &mut surface, job).await;

    assert!(matches!(result, Err(Error::CaptureStalled)));
}
