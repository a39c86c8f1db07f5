//! Document building and saving collaborators.
//!
//! The export compiler does not know anything about document containers: it
//! hands its [`ExportBundle`](crate::ExportBundle) to a [`DocumentBuilder`]
//! and the resulting blob to a [`FileSink`]. Both are seams for the host to
//! plug its own formats and storage into.
//!
//! Shipped implementations: [`ZipDocumentBuilder`], which packs the
//! full-resolution JPEGs plus a JSON page manifest into a ZIP archive, and
//! [`DirectorySink`], which writes the blob into a directory on disk.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::Error;
use crate::export::ExportBundle;

/// Fixed prefix for suggested export filenames.
pub const EXPORT_FILENAME_PREFIX: &str = "evidence";

/// Turns an export bundle into a single document blob.
///
/// The builder owns layout and container encoding; the export compiler only
/// guarantees the bundle's frames arrive in ledger order. Build failures
/// surface as [`Error::DocumentBuild`] and are reported once, never retried.
pub trait DocumentBuilder {
    /// File extension (without the dot) of the produced document format.
    fn extension(&self) -> &str;

    /// Compile `bundle` into a document blob.
    fn build(&self, bundle: &ExportBundle) -> Result<Vec<u8>, Error>;
}

/// Persists a finished document blob.
pub trait FileSink {
    /// Save `blob` under `suggested_filename`, returning the saved path.
    fn save(&self, blob: &[u8], suggested_filename: &str) -> Result<PathBuf, Error>;
}

/// Suggested filename for an export: fixed prefix plus a compact ISO-8601
/// UTC timestamp plus the document extension.
///
/// # Example
///
/// ```
/// let name = framesift::suggested_filename("zip");
/// assert!(name.starts_with("evidence-"));
/// assert!(name.ends_with(".zip"));
/// ```
pub fn suggested_filename(extension: &str) -> String {
    // Basic-format ISO-8601: colons are not filename-safe everywhere.
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("{EXPORT_FILENAME_PREFIX}-{stamp}.{extension}")
}

/// A [`DocumentBuilder`] producing a ZIP archive.
///
/// Each frame becomes a numbered JPEG entry in ledger order, stored without
/// recompression (the rasters are already JPEG), alongside a
/// `manifest.json` describing every page's timestamp and dimensions.
#[derive(Debug, Clone, Default)]
pub struct ZipDocumentBuilder;

impl ZipDocumentBuilder {
    /// Create a ZIP document builder.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBuilder for ZipDocumentBuilder {
    fn extension(&self) -> &str {
        "zip"
    }

    fn build(&self, bundle: &ExportBundle) -> Result<Vec<u8>, Error> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        // Rasters are already JPEG; deflating them again buys nothing.
        let stored = || SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut pages = Vec::with_capacity(bundle.len());
        for (index, frame) in bundle.iter().enumerate() {
            let name = format!(
                "frame-{:04}-{}s.jpg",
                index + 1,
                frame.timestamp.as_secs(),
            );
            writer
                .start_file(name.as_str(), stored())
                .map_err(|error| Error::DocumentBuild(error.to_string()))?;
            writer.write_all(&frame.image.data)?;

            pages.push(json!({
                "file": name,
                "timestamp_seconds": frame.timestamp.as_secs_f64(),
                "width": frame.image.width,
                "height": frame.image.height,
            }));
        }

        let manifest = json!({
            "pages": pages,
            "page_count": bundle.len(),
        });
        writer
            .start_file("manifest.json", stored())
            .map_err(|error| Error::DocumentBuild(error.to_string()))?;
        let manifest_bytes = serde_json::to_vec_pretty(&manifest)
            .map_err(|error| Error::DocumentBuild(error.to_string()))?;
        writer.write_all(&manifest_bytes)?;

        let cursor = writer
            .finish()
            .map_err(|error| Error::DocumentBuild(error.to_string()))?;
        Ok(cursor.into_inner())
    }
}

/// A [`FileSink`] that writes blobs into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `directory`.
    ///
    /// The directory is created on first save if it does not exist.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }
}

impl FileSink for DirectorySink {
    fn save(&self, blob: &[u8], suggested_filename: &str) -> Result<PathBuf, Error> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(suggested_filename);
        std::fs::write(&path, blob)?;
        log::debug!("Saved {} bytes to {}", blob.len(), path.display());
        Ok(path)
    }
}
