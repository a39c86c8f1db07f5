//! Sample a video into a thumbnail timeline and write the JPEGs to disk.
//!
//! Usage: cargo run --example sample_thumbnails -- <video> <output-dir>

use std::time::Duration;

use framesift::{CaptureOptions, CaptureSurface, VideoFile, for_each_thumbnail};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input.mp4".to_string());
    let output = args.next().unwrap_or_else(|| "thumbs".to_string());

    std::fs::create_dir_all(&output)?;

    let mut media = VideoFile::open(&input)?;
    println!(
        "{}: {:.2}s, {}x{}",
        input,
        media.info().duration.as_secs_f64(),
        media.info().width,
        media.info().height,
    );

    let mut surface = CaptureSurface::new();
    let mut count = 0_u32;
    for_each_thumbnail(
        &mut media,
        &mut surface,
        Duration::from_secs(1),
        &CaptureOptions::new(),
        |thumbnail| {
            let path = format!("{output}/thumb_{}s.jpg", thumbnail.timestamp.as_secs());
            std::fs::write(&path, &thumbnail.image.data)?;
            count += 1;
            Ok(())
        },
    )
    .await?;

    println!("wrote {count} thumbnails to {output}/");
    Ok(())
}
