use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framesift::{
    CaptureOptions, CaptureSurface, DecoderLogLevel, DirectorySink, Gallery, MediaHandle,
    ProgressCallback, ProgressInfo, VideoFile, ZipDocumentBuilder, for_each_thumbnail,
    set_decoder_log_level,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framesift metadata input.mp4 --json\n  framesift sample input.mp4 --out thumbs --progress\n  framesift export input.mp4 --select 2 --select 0 --select 5 --out exports\n  framesift completions zsh > _framesift";

#[derive(Debug, Parser)]
#[command(
    name = "framesift",
    version,
    about = "Sample video frames, curate a selection, and export the chosen stills",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar where supported.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, error, warning, info, debug).
    #[arg(long)]
    log_level: Option<String>,

    /// JPEG quality for captured frames (1-100).
    #[arg(long, default_value_t = framesift::DEFAULT_JPEG_QUALITY)]
    quality: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print metadata for a video file (alias: probe).
    #[command(
        about = "Print video metadata",
        visible_alias = "probe",
        visible_alias = "info",
        after_help = "Examples:\n  framesift metadata input.mp4\n  framesift metadata input.mp4 --json"
    )]
    Metadata {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Sample the timeline into thumbnail JPEGs.
    #[command(
        about = "Sample the timeline into thumbnails",
        after_help = "Examples:\n  framesift sample input.mp4 --out thumbs\n  framesift sample input.mp4 --out thumbs --interval 2 --progress"
    )]
    Sample {
        /// Input video path.
        input: PathBuf,

        /// Output directory for thumbnail images.
        #[arg(long)]
        out: PathBuf,

        /// Sampling interval in whole seconds.
        #[arg(long, default_value_t = 1)]
        interval: u64,

        /// Linear downscale divisor applied to the natural resolution.
        #[arg(long, default_value_t = framesift::DEFAULT_THUMBNAIL_DIVISOR)]
        divisor: u32,
    },

    /// Select timestamps and export them as a document.
    #[command(
        about = "Export selected frames as a document",
        after_help = "Examples:\n  framesift export input.mp4 --select 2 --select 0 --select 5\n  framesift export input.mp4 --select 1 --select 3 --out exports --progress\n\nFrames are exported in the order the --select flags are given."
    )]
    Export {
        /// Input video path.
        input: PathBuf,

        /// Timestamp to select, in whole seconds. Repeatable; order is
        /// preserved in the exported document.
        #[arg(long = "select", required = true)]
        select: Vec<u64>,

        /// Output directory for the exported document.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Drives an indicatif progress bar from pipeline progress callbacks.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::no_length();
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if let Some(timestamp) = info.current_timestamp {
            self.bar.set_message(format!("{}s", timestamp.as_secs()));
        }
        if Some(info.current) == info.total {
            self.bar.finish_with_message("done");
        }
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed = DecoderLogLevel::from_name(level)
            .ok_or(format!("unsupported --log-level: {level}"))?;
        set_decoder_log_level(parsed);
    }

    if global.quality == 0 || global.quality > 100 {
        return Err(format!("--quality must be between 1 and 100, got {}", global.quality).into());
    }

    Ok(())
}

fn capture_options(global: &GlobalOptions) -> CaptureOptions {
    let mut options = CaptureOptions::new();
    if global.progress {
        options = options.with_progress(Arc::new(TerminalProgress::new()));
    }
    options
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Metadata { input, json } => {
            let media = VideoFile::open(&input)?;
            let info = media.info();
            if json {
                let payload = json!({
                    "format": info.format,
                    "duration_seconds": info.duration.as_secs_f64(),
                    "width": info.width,
                    "height": info.height,
                    "fps": info.frames_per_second,
                    "codec": info.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", info.format);
                println!("Duration: {:.2}s", info.duration.as_secs_f64());
                println!(
                    "Video: {}x{} @ {:.2} fps [{}]",
                    info.width, info.height, info.frames_per_second, info.codec,
                );
            }
        }
        Commands::Sample {
            input,
            out,
            interval,
            divisor,
        } => {
            if interval == 0 {
                return Err("--interval must be greater than 0".into());
            }

            if out.exists() {
                if !cli.global.overwrite {
                    return Err(format!(
                        "output directory already exists: {} (use --overwrite)",
                        out.display()
                    )
                    .into());
                }
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("writing into existing directory {}", out.display()).yellow()
                );
            }
            fs::create_dir_all(&out)?;

            let mut media = VideoFile::open(&input)?;
            let mut surface = CaptureSurface::with_quality(cli.global.quality);
            let options = capture_options(&cli.global).with_thumbnail_divisor(divisor);

            let mut written = 0_u64;
            let verbose = cli.global.verbose;
            for_each_thumbnail(
                &mut media,
                &mut surface,
                Duration::from_secs(interval),
                &options,
                |thumbnail| {
                    let path = out.join(format!(
                        "thumb_{:04}_{}s.jpg",
                        written,
                        thumbnail.timestamp.as_secs(),
                    ));
                    fs::write(&path, &thumbnail.image.data)?;
                    written += 1;
                    if verbose {
                        eprintln!(
                            "saved thumbnail at {}s -> {}",
                            thumbnail.timestamp.as_secs(),
                            path.display(),
                        );
                    }
                    Ok(())
                },
            )
            .await?;

            println!(
                "{} {}",
                "success:".green().bold(),
                format!("Sampled {written} thumbnail(s) to {}", out.display()).green()
            );
        }
        Commands::Export { input, select, out } => {
            let options = capture_options(&cli.global);
            let mut gallery = Gallery::with_options(options)
                .with_surface(CaptureSurface::with_quality(cli.global.quality));

            gallery.load_media(VideoFile::open(&input)?);
            let sampled = gallery.sample(Duration::from_secs(1)).await?;
            if cli.global.verbose {
                eprintln!("sampled {sampled} thumbnail(s)");
            }

            for &seconds in &select {
                gallery.select(Duration::from_secs(seconds)).map_err(|_| {
                    format!(
                        "no frame at {seconds}s (video is {:.2}s long)",
                        gallery
                            .media()
                            .map(|media| media.duration().as_secs_f64())
                            .unwrap_or_default(),
                    )
                })?;
            }

            let saved = gallery
                .export(&ZipDocumentBuilder::new(), &DirectorySink::new(&out))
                .await?;

            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Exported {} frame(s) to {}",
                    select.len(),
                    saved.display()
                )
                .green()
            );
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framesift", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use framesift::DecoderLogLevel;

    #[test]
    fn log_level_aliases() {
        assert!(DecoderLogLevel::from_name("quiet").is_some());
        assert!(DecoderLogLevel::from_name("WARNING").is_some());
        assert!(DecoderLogLevel::from_name("trace").is_none());
    }
}
