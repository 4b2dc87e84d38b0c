//! Command-line arguments

use std::path::PathBuf;

use abedl_core::DownloadOptions;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "abedl",
    author,
    version,
    about = "ABEDL - Abe's Extensible Downloader",
    long_about = "A modular video downloader for YouTube, CBN and Keys for Kids.\n\
                  YouTube and CBN downloads require yt-dlp; ffmpeg is recommended."
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a video or playlist from a URL
    Download(DownloadArgs),

    /// Show information about a video or playlist without downloading
    Info {
        url: String,
    },

    /// List available formats for a video URL
    Formats {
        url: String,
    },

    /// List supported platforms and example URLs
    Platforms,

    /// Download Keys for Kids devotionals by URL or date
    #[command(name = "keysforkids")]
    KeysForKids(KeysForKidsArgs),

    /// Test the installation and available downloaders
    Test,

    /// Show the effective configuration
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Video or playlist URL
    pub url: String,

    /// Output directory for downloaded files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Video quality (best, worst, 720p, 1080p, ...)
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Download audio only
    #[arg(short, long)]
    pub audio_only: bool,

    /// Audio format for audio-only downloads (mp3, wav, ...)
    #[arg(long, value_name = "FORMAT")]
    pub audio_format: Option<String>,

    /// Container to remux video into (mp4, mkv, ...)
    #[arg(long, value_name = "FORMAT")]
    pub video_format: Option<String>,

    /// Download subtitles
    #[arg(short, long)]
    pub subtitles: bool,

    /// Embed subtitles in the video file
    #[arg(long)]
    pub embed_subtitles: bool,

    /// Write video info to a JSON file
    #[arg(long = "write-info")]
    pub write_info: bool,

    /// Write the thumbnail image
    #[arg(long)]
    pub write_thumbnail: bool,

    /// Playlist video to start at
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub playlist_start: usize,

    /// Playlist video to end at (default: last video)
    #[arg(long, value_name = "N")]
    pub playlist_end: Option<usize>,

    /// Playlist video indices to download, e.g. "1,3,5-8,10"
    #[arg(long, value_name = "SPEC")]
    pub playlist_items: Option<String>,

    /// Read cookies from a browser (chrome, firefox, safari, ...)
    #[arg(long, value_name = "BROWSER")]
    pub cookies_from_browser: Option<String>,

    /// Cookies file in Netscape format
    #[arg(long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,
}

impl DownloadArgs {
    /// Layers the command-line flags over `base`
    pub fn apply(&self, mut base: DownloadOptions) -> DownloadOptions {
        if let Some(dir) = &self.output_dir {
            base.output_dir = dir.clone();
        }
        if let Some(quality) = &self.quality {
            base.quality = quality.clone();
        }
        if self.audio_format.is_some() {
            base.audio_format = self.audio_format.clone();
        }
        if self.video_format.is_some() {
            base.video_format = self.video_format.clone();
        }
        if self.cookies_from_browser.is_some() {
            base.cookies_from_browser = self.cookies_from_browser.clone();
        }
        if self.cookies.is_some() {
            base.cookies = self.cookies.clone();
        }

        base.audio_only |= self.audio_only;
        base.subtitles |= self.subtitles;
        base.embed_subtitles |= self.embed_subtitles;
        base.write_info_json |= self.write_info;
        base.write_thumbnail |= self.write_thumbnail;

        base.playlist_start = self.playlist_start;
        base.playlist_end = self.playlist_end;
        base.playlist_items = self.playlist_items.clone();
        base
    }
}

#[derive(Args, Debug)]
pub struct KeysForKidsArgs {
    /// Devotional page URL
    #[arg(conflicts_with_all = ["date", "start_date"])]
    pub url: Option<String>,

    /// Devotional date (YYYY-MM-DD); defaults to today
    #[arg(long, value_name = "DATE", conflicts_with = "start_date")]
    pub date: Option<NaiveDate>,

    /// First date of a range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "end_date")]
    pub start_date: Option<NaiveDate>,

    /// Last date of a range, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "start_date")]
    pub end_date: Option<NaiveDate>,

    /// Output directory for downloaded files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// What the `keysforkids` command should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevotionalTarget {
    Url(String),
    Date(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl KeysForKidsArgs {
    /// Resolves the arguments, using `today` when nothing was given
    pub fn target(&self, today: NaiveDate) -> DevotionalTarget {
        if let Some(url) = &self.url {
            return DevotionalTarget::Url(url.clone());
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DevotionalTarget::Range(start, end),
            _ => DevotionalTarget::Date(self.date.unwrap_or(today)),
        }
    }
}
