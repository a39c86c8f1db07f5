//! Drive a whole gallery session: sample, select, export a document.
//!
//! Usage: cargo run --example export_selection -- <video> <seconds>...

use std::time::Duration;

use framesift::{DirectorySink, Gallery, VideoFile, ZipDocumentBuilder};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input.mp4".to_string());
    let selections: Vec<u64> = args.filter_map(|arg| arg.parse().ok()).collect();

    let mut gallery = Gallery::new();
    gallery.load_media(VideoFile::open(&input)?);

    let sampled = gallery.sample(Duration::from_secs(1)).await?;
    println!("sampled {sampled} thumbnails");

    // Default to the first and last thumbnail when nothing was requested.
    let selections = if selections.is_empty() {
        vec![0, sampled.saturating_sub(1) as u64]
    } else {
        selections
    };

    for seconds in selections {
        gallery.select(Duration::from_secs(seconds))?;
        println!("selected {seconds}s");
    }

    let saved = gallery
        .export(&ZipDocumentBuilder::new(), &DirectorySink::new("exports"))
        .await?;
    println!("exported to {}", saved.display());
    Ok(())
}
