//! FFmpeg-backed `VideoFile` integration tests.
//!
//! These require a fixture video; generate one with:
//! `ffmpeg -f lavfi -i testsrc=duration=5:size=640x480:rate=25 tests/fixtures/sample_video.mp4`
//! Tests skip silently when the fixture is absent.

use std::path::Path;
use std::time::Duration;

use framesift::{CaptureOptions, CaptureSurface, Error, MediaHandle, VideoFile, sample};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn open_reports_metadata() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let media = VideoFile::open(path).expect("Failed to open fixture");
    let info = media.info();

    assert!(info.width > 0);
    assert!(info.height > 0);
    assert!(info.duration > Duration::ZERO);
    assert_eq!(media.natural_width(), info.width);
    assert_eq!(media.natural_height(), info.height);
}

#[test]
fn open_missing_file_fails() {
    let result = VideoFile::open("tests/fixtures/does_not_exist.mp4");
    assert!(matches!(result, Err(Error::FileOpen { .. })));
}

#[tokio::test]
async fn seek_publishes_a_frame() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut media = VideoFile::open(path).expect("Failed to open fixture");
    assert!(media.current_frame().is_none(), "no frame before first seek");

    media.seek(Duration::from_secs(1)).await.expect("seek failed");

    let frame = media.current_frame().expect("frame after seek");
    assert_eq!(frame.width(), media.natural_width());
    assert_eq!(frame.height(), media.natural_height());
}

#[tokio::test]
async fn sequential_seeks_replace_the_current_frame() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut media = VideoFile::open(path).expect("Failed to open fixture");

    media.seek(Duration::from_secs(0)).await.expect("seek failed");
    let first = media.current_frame().expect("frame after first seek");

    media.seek(Duration::from_secs(3)).await.expect("seek failed");
    let second = media.current_frame().expect("frame after second seek");

    // The fixture's test pattern animates, so distinct seconds differ.
    assert_ne!(first.as_raw(), second.as_raw());
}

#[tokio::test]
async fn sampling_a_real_video_produces_the_expected_count() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut media = VideoFile::open(path).expect("Failed to open fixture");
    let duration = media.duration().as_secs_f64();
    let expected = duration.ceil() as usize;

    let mut surface = CaptureSurface::new();
    let thumbnails = sample(
        &mut media,
        &mut surface,
        Duration::from_secs(1),
        &CaptureOptions::new(),
    )
    .await
    .expect("sampling failed");

    assert_eq!(thumbnails.len(), expected);
    let first = thumbnails.get(0).expect("at least one thumbnail");
    assert_eq!(first.image.width, media.natural_width() / 4);
}

#[tokio::test]
async fn dropping_the_file_stalls_pending_seeks() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut media = VideoFile::open(path).expect("Failed to open fixture");
    // First seek warms the worker up so drop-timing is the only variable.
    media.seek(Duration::from_secs(0)).await.expect("seek failed");

    let pending = media.seek(Duration::from_secs(2));
    drop(media);

    // Either the worker finished the command before shutdown, or the
    // teardown surfaced as a stall. It must not hang.
    match pending.await {
        Ok(()) | Err(Error::CaptureStalled) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}
