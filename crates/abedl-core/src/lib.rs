//! ABEDL core library
//!
//! Downloads videos and audio from YouTube, CBN and Keys for Kids.
//!
//! # Overview
//!
//! - A [`Registry`] maps URLs to platform [`Downloader`]s
//! - YouTube and CBN are driven through the yt-dlp executable ([`YtDlp`])
//! - Keys for Kids devotionals are scraped directly with a rate-limited
//!   [`HttpClient`], including lookup by publication date
//! - Playlist selection strings such as `"1-3,7"` are parsed by
//!   [`parse_playlist_items`]
//!
//! # Example
//!
//! ```no_run
//! use abedl_core::{Config, Downloader, Registry, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load();
//!     let registry = Registry::with_builtins(config.downloader_context());
//!
//!     let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//!     let downloader = registry.downloader_for_url(url, &config.download_options())?;
//!
//!     for path in downloader.download(url).await? {
//!         println!("Saved {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # External tools
//!
//! yt-dlp must be installed for YouTube and CBN. ffmpeg is additionally
//! needed for audio extraction, subtitle embedding and remuxing. Use
//! [`tools::probe_all`] to check for both.

mod client;
mod config;
mod downloader;
mod error;
pub mod parser;
pub mod platforms;
mod playlist;
mod progress;
mod registry;
pub mod tools;
mod types;
pub mod url;
pub mod ytdlp;

// Re-export client types
pub use client::{BROWSER_USER_AGENT, ClientConfig, HttpClient, RateLimiter};

pub use config::Config;

pub use downloader::{Downloader, truncate_chars};

// Re-export error types
pub use error::{AbedlError, Result};

pub use platforms::{CbnDownloader, KeysForKidsDownloader, YouTubeDownloader};

pub use playlist::{MAX_PLAYLIST_INDEX, PlaylistItems, parse_playlist_items, select_entries};

pub use registry::{DownloaderContext, Factory, Registry, factory};

// Re-export data types
pub use types::{DownloadOptions, FormatInfo, VideoInfo};

pub use ytdlp::YtDlp;
