//! Subcommand implementations
//!
//! Each command prints its results to stdout and returns the exit code.
//! Errors bubble up as `anyhow` errors carrying a short context line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use abedl_core::platforms::youtube::BOT_DETECTION_HELP;
use abedl_core::tools::{self, ToolType};
use abedl_core::{
    AbedlError, Config, Downloader, FormatInfo, KeysForKidsDownloader, Registry, truncate_chars,
};
use anyhow::{Context, bail};
use chrono::Local;
use tracing::debug;

use crate::cli::{Cli, Command, DevotionalTarget, DownloadArgs, KeysForKidsArgs};

/// Runs the parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    debug!("Effective config: {:?}", config);

    match cli.command {
        Command::Download(args) => download(&args, &config).await,
        Command::Info { url } => info(&url, &config).await,
        Command::Formats { url } => formats(&url, &config).await,
        Command::Platforms => platforms(&config),
        Command::KeysForKids(args) => keysforkids(&args, &config).await,
        Command::Test => self_test(&config).await,
        Command::Config { init } => show_config(&config, cli.config.as_deref(), init),
    }
}

fn registry(config: &Config) -> Registry {
    Registry::with_builtins(config.downloader_context())
}

async fn download(args: &DownloadArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let options = args.apply(config.download_options());

    println!("Finding downloader for URL: {}", args.url);
    let downloader = registry(config)
        .downloader_for_url(&args.url, &options)
        .context("Download failed")?;

    println!("Starting download to: {}", options.output_dir.display());
    match downloader.download(&args.url).await {
        Ok(files) => Ok(report_files(&files)),
        Err(e) => {
            if matches!(e, AbedlError::BotDetection(_)) {
                eprintln!("\n{}\n", BOT_DETECTION_HELP);
            }
            Err(anyhow::Error::new(e).context("Download failed"))
        }
    }
}

/// Lists saved files; nothing saved is a failure
fn report_files(files: &[PathBuf]) -> ExitCode {
    if files.is_empty() {
        println!("\n⚠️  No files were downloaded. Check the URL and try again.");
        return ExitCode::FAILURE;
    }

    println!("\n✓ Successfully downloaded {} file(s):", files.len());
    for file in files {
        println!("  • {}", file.display());
    }
    ExitCode::SUCCESS
}

async fn info(url: &str, config: &Config) -> anyhow::Result<ExitCode> {
    let downloader = registry(config)
        .downloader_for_url(url, &config.download_options())
        .context("Failed to get info")?;

    if downloader.is_playlist(url) {
        let videos = downloader
            .playlist_info(url)
            .await
            .context("Failed to get info")?;

        println!("📋 Playlist Information:");
        println!("Total videos: {}", videos.len());
        println!("\nVideos:");
        for (i, video) in videos.iter().enumerate() {
            let duration = video
                .duration
                .map(|d| format!(" ({}s)", d))
                .unwrap_or_default();
            println!("  {:2}. {}{}", i + 1, video.title, duration);
            if let Some(uploader) = &video.uploader {
                println!("      by {}", uploader);
            }
        }
    } else {
        let video = downloader
            .video_info(url)
            .await
            .context("Failed to get info")?;

        println!("🎥 Video Information:");
        println!("Title: {}", video.title);
        if let Some(uploader) = &video.uploader {
            println!("Uploader: {}", uploader);
        }
        if let Some(duration) = video.duration.filter(|d| *d > 0) {
            println!("Duration: {} seconds", duration);
        }
        if let Some(views) = video.view_count.filter(|v| *v > 0) {
            println!("Views: {}", group_thousands(views));
        }
        if let Some(date) = &video.upload_date {
            println!("Upload Date: {}", date);
        }
        if let Some(description) = video.description.as_deref().filter(|d| !d.is_empty()) {
            println!("Description: {}", truncate_chars(description, 200));
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn formats(url: &str, config: &Config) -> anyhow::Result<ExitCode> {
    let downloader = registry(config)
        .downloader_for_url(url, &config.download_options())
        .context("Failed to list formats")?;

    if downloader.is_playlist(url) {
        println!("📋 Playlist detected. Use 'info' command to see playlist contents.");
        return Ok(ExitCode::SUCCESS);
    }

    let formats = downloader
        .formats(url)
        .await
        .context("Failed to list formats")?;

    println!("📋 Available Formats:");
    println!(
        "{:<12} {:<5} {:<12} {:>5} {:>10}  {:<24} {}",
        "ID", "EXT", "RESOLUTION", "FPS", "SIZE", "CODECS", "NOTE"
    );
    for format in &formats {
        println!("{}", format_row(format));
    }
    if formats.is_empty() {
        println!("(no formats reported)");
    }

    Ok(ExitCode::SUCCESS)
}

fn format_row(format: &FormatInfo) -> String {
    let fps = format.fps.map(|f| format!("{:.0}", f)).unwrap_or_default();
    let size = format.filesize.map(human_size).unwrap_or_default();
    let codecs = match (format.vcodec.as_deref(), format.acodec.as_deref()) {
        (Some(v), Some(a)) => format!("{} / {}", v, a),
        (Some(v), None) => v.to_string(),
        (None, Some(a)) => a.to_string(),
        (None, None) => String::new(),
    };

    format!(
        "{:<12} {:<5} {:<12} {:>5} {:>10}  {:<24} {}",
        format.format_id,
        format.ext,
        format.resolution.as_deref().unwrap_or(""),
        fps,
        size,
        codecs,
        format.format_note.as_deref().unwrap_or("")
    )
    .trim_end()
    .to_string()
}

fn platforms(config: &Config) -> anyhow::Result<ExitCode> {
    println!("🌐 Supported Platforms:");
    let supported = registry(config).supported_platforms()?;

    if supported.is_empty() {
        println!("No downloaders registered.");
        return Ok(ExitCode::SUCCESS);
    }

    for (platform, examples) in supported {
        println!("\n{}:", platform.to_uppercase());
        for example in examples {
            println!("  • {}", example);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn keysforkids(args: &KeysForKidsArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let mut options = config.download_options();
    if let Some(dir) = &args.output_dir {
        options.output_dir = dir.clone();
    }
    let kfk = KeysForKidsDownloader::new(options, config.downloader_context().http)?;

    match args.target(Local::now().date_naive()) {
        DevotionalTarget::Url(url) => {
            if !kfk.can_handle(&url) {
                bail!("Not a Keys for Kids URL: {}", url);
            }
            let path = kfk
                .download_video(&url)
                .await
                .context("Devotional download failed")?;
            Ok(report_files(&[path]))
        }
        DevotionalTarget::Date(date) => {
            println!("Looking for the devotional for {}", date.format("%B %-d, %Y"));
            let saved = kfk
                .download_by_date(date)
                .await
                .context("Devotional download failed")?;
            match saved {
                Some(path) => Ok(report_files(&[path])),
                None => {
                    println!("\n⚠️  No devotional found for {}", date.format("%Y-%m-%d"));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        DevotionalTarget::Range(start, end) => {
            if start > end {
                bail!("Start date {} is after end date {}", start, end);
            }
            let days = (end - start).num_days() + 1;
            println!("Downloading devotionals for {} day(s), {} to {}", days, start, end);
            let files = kfk.download_date_range(start, end).await;
            Ok(report_files(&files))
        }
    }
}

async fn self_test(config: &Config) -> anyhow::Result<ExitCode> {
    println!("🔧 Testing ABEDL Installation...");

    let downloaders = registry(config).list_downloaders();
    println!(
        "✓ Registry loaded with {} downloader(s): {}",
        downloaders.len(),
        downloaders.join(", ")
    );

    let mut ok = true;
    for tool in tools::probe_all().await {
        let name = tool.tool_type.as_str();
        match (&tool.path, &tool.version) {
            (Some(_), Some(version)) => println!("✓ {} is available: {}", name, version),
            (Some(path), None) => {
                println!("⚠️  {} found at {} but may have issues", name, path.display())
            }
            (None, _) => {
                match tool.tool_type {
                    ToolType::YtDlp => {
                        ok = false;
                        println!("❌ {} is not installed (required for YouTube and CBN)", name);
                    }
                    ToolType::Ffmpeg => {
                        println!("⚠️  {} not found (recommended for full functionality)", name)
                    }
                }
                println!("   {}", tool.tool_type.install_hint());
            }
        }
    }

    println!("\n🎉 Installation test complete!");
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn show_config(config: &Config, explicit: Option<&Path>, init: bool) -> anyhow::Result<ExitCode> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(Config::default_path)
        .context("Could not determine a config directory")?;

    if init {
        config
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✓ Wrote config to {}", path.display());
    } else {
        let state = if path.exists() { "" } else { " (not created yet, showing defaults)" };
        println!("Config file: {}{}", path.display(), state);
    }

    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}

/// `1234567` → `1,234,567`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
