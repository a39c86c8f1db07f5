//! Gallery session lifecycle behaviour.

mod common;

use std::io::Read;
use std::time::Duration;

use common::SyntheticMedia;
use framesift::{DirectorySink, Error, Gallery, ZipDocumentBuilder};

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

fn media(duration_seconds: f64) -> SyntheticMedia {
    SyntheticMedia::new(Duration::from_secs_f64(duration_seconds), 640, 480)
}

#[tokio::test]
async fn sample_requires_media() {
    let mut gallery: Gallery<SyntheticMedia> = Gallery::new();
    let result = gallery.sample(secs(1)).await;
    assert!(matches!(result, Err(Error::NoMediaLoaded)));
}

#[tokio::test]
async fn sample_populates_thumbnails() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(3.4));

    let count = gallery.sample(secs(1)).await.unwrap();
    assert_eq!(count, 4);
    assert_eq!(gallery.thumbnails().len(), 4);
    assert!(!gallery.is_sampling(), "flag clears after completion");
}

#[tokio::test]
async fn select_validates_against_sampled_timestamps() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(3.0));
    gallery.sample(secs(1)).await.unwrap();

    gallery.select(secs(1)).unwrap();
    assert!(gallery.ledger().contains(secs(1)));
    assert_eq!(gallery.ledger().highlighted(), Some(secs(1)));

    let unknown = gallery.select(secs(42));
    assert!(matches!(unknown, Err(Error::UnknownTimestamp(_))));
}

#[tokio::test]
async fn reselecting_the_same_timestamp_keeps_one_entry() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(3.0));
    gallery.sample(secs(1)).await.unwrap();

    gallery.select(secs(1)).unwrap();
    gallery.select(secs(1)).unwrap();
    assert_eq!(gallery.ledger().len(), 1);
}

#[tokio::test]
async fn deselect_and_toggle() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(5.0));
    gallery.sample(secs(1)).await.unwrap();

    assert!(gallery.toggle(secs(2)).unwrap());
    assert!(!gallery.toggle(secs(2)).unwrap());
    assert!(gallery.ledger().is_empty());

    gallery.select(secs(3)).unwrap();
    gallery.deselect(secs(3));
    gallery.deselect(secs(3)); // absent: no-op
    assert!(gallery.ledger().is_empty());
}

#[tokio::test]
async fn loading_new_media_clears_thumbnails_and_selection() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(5.0));
    gallery.sample(secs(1)).await.unwrap();
    gallery.select(secs(2)).unwrap();

    assert_eq!(gallery.thumbnails().len(), 5);
    assert_eq!(gallery.ledger().len(), 1);

    // Second video replaces the first: both collections are emptied
    // before any re-sampling happens.
    gallery.load_media(media(2.0));
    assert!(gallery.thumbnails().is_empty());
    assert!(gallery.ledger().is_empty());
    assert_eq!(gallery.ledger().highlighted(), None);

    let count = gallery.sample(secs(1)).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn load_media_cancels_the_previous_token() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(5.0));
    let stale_token = gallery.cancellation();

    gallery.load_media(media(5.0));
    assert!(stale_token.is_cancelled(), "old load's token is cancelled");
    assert!(!gallery.cancellation().is_cancelled(), "new load is fresh");
}

#[tokio::test]
async fn cancelled_token_aborts_sampling() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(30.0));
    gallery.cancellation().cancel();

    let result = gallery.sample(secs(1)).await;
    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(gallery.thumbnails().is_empty());
}

#[tokio::test]
async fn export_requires_media_and_selection() {
    let builder = ZipDocumentBuilder::new();
    let temp = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(temp.path());

    let mut gallery: Gallery<SyntheticMedia> = Gallery::new();
    let result = gallery.export(&builder, &sink).await;
    assert!(matches!(result, Err(Error::NoMediaLoaded)));

    gallery.load_media(media(5.0));
    let result = gallery.export(&builder, &sink).await;
    assert!(matches!(result, Err(Error::EmptySelection)));
}

#[tokio::test]
async fn full_session_exports_selected_frames_in_order() {
    let mut gallery = Gallery::new();
    gallery.load_media(media(3.4));
    gallery.sample(secs(1)).await.unwrap();

    gallery.select(secs(1)).unwrap();
    gallery.select(secs(3)).unwrap();

    let temp = tempfile::tempdir().unwrap();
    let saved = gallery
        .export(&ZipDocumentBuilder::new(), &DirectorySink::new(temp.path()))
        .await
        .unwrap();

    assert!(saved.exists());
    let filename = saved.file_name().unwrap().to_string_lossy();
    assert!(filename.starts_with("evidence-"));
    assert!(filename.ends_with(".zip"));

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&saved).unwrap()).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    assert!(names.contains(&"frame-0001-1s.jpg".to_string()));
    assert!(names.contains(&"frame-0002-3s.jpg".to_string()));

    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .unwrap()
        .read_to_string(&mut manifest)
        .unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["page_count"], 2);
    assert_eq!(manifest["pages"][0]["width"], 640);
}
