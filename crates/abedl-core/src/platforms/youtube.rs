//! YouTube downloader

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};

use crate::downloader::{Downloader, ensure_output_dir};
use crate::error::{AbedlError, Result};
use crate::playlist::select_entries;
use crate::types::{DownloadOptions, FormatInfo, VideoInfo};
use crate::url::{build_watch_url, normalize_playlist_url};
use crate::ytdlp::YtDlp;

static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:https?://)?(?:www\.|m\.)?youtube\.com/watch\?v=[\w-]+",
        r"(?i)^(?:https?://)?(?:www\.|m\.)?youtube\.com/playlist\?list=[\w-]+",
        r"(?i)^(?:https?://)?(?:www\.)?youtu\.be/[\w-]+",
        r"(?i)^(?:https?://)?(?:www\.)?youtube\.com/channel/[\w-]+",
        r"(?i)^(?:https?://)?(?:www\.)?youtube\.com/@[\w.-]+",
        r"(?i)^(?:https?://)?(?:www\.)?youtube\.com/c/[\w-]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static PLAYLIST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)youtube\.com/playlist\?list=", r"(?i)youtube\.com/watch\?.*list="]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

const EXAMPLE_URLS: &[&str] = &[
    "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "https://www.youtube.com/playlist?list=PLrAXtmRdnEQy6nuLMt9xaJGA6H_VjlXEL",
    "https://youtu.be/dQw4w9WgXcQ",
];

/// Printed when YouTube asks the user to prove they are not a bot
pub const BOT_DETECTION_HELP: &str = "\
YouTube is asking for sign-in to confirm you're not a bot. Try one of:
  1. Wait a while and try again later
  2. Pass cookies from a browser you are signed in with:
       abedl download --cookies-from-browser chrome URL
       (firefox and safari also work)
  3. Export cookies to a cookies.txt file and pass --cookies cookies.txt
See https://github.com/yt-dlp/yt-dlp/wiki/FAQ#how-do-i-pass-cookies-to-yt-dlp";

pub struct YouTubeDownloader {
    options: DownloadOptions,
    ytdlp: YtDlp,
}

impl YouTubeDownloader {
    pub fn new(options: DownloadOptions, ytdlp: YtDlp) -> Self {
        Self { options, ytdlp }
    }

    fn output_template(&self) -> String {
        self.options
            .output_dir
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned()
    }

    /// Format selector to retry with after the requested one is unavailable
    fn fallback_format(&self) -> &'static str {
        if self.options.audio_only {
            "bestaudio"
        } else {
            "best"
        }
    }
}

#[async_trait]
impl Downloader for YouTubeDownloader {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn example_urls(&self) -> &'static [&'static str] {
        EXAMPLE_URLS
    }

    fn can_handle(&self, url: &str) -> bool {
        URL_PATTERNS.iter().any(|re| re.is_match(url.trim()))
    }

    fn is_playlist(&self, url: &str) -> bool {
        PLAYLIST_PATTERNS.iter().any(|re| re.is_match(url))
    }

    async fn video_info(&self, url: &str) -> Result<VideoInfo> {
        let info = self.ytdlp.video_info(url, &self.options).await?;
        Ok(info.to_video_info(url))
    }

    async fn playlist_info(&self, url: &str) -> Result<Vec<VideoInfo>> {
        let playlist_url = normalize_playlist_url(url);
        let listing = self.ytdlp.playlist(&playlist_url, &self.options).await?;

        let videos: Vec<VideoInfo> = listing
            .entries
            .iter()
            .flatten()
            .map(|entry| {
                let entry_url = entry
                    .url
                    .clone()
                    .or_else(|| entry.id.as_deref().map(build_watch_url))
                    .unwrap_or_default();
                entry.to_video_info(&entry_url)
            })
            .collect();

        if videos.is_empty() {
            return Err(AbedlError::NotFound(format!(
                "No entries found in playlist: {}",
                playlist_url
            )));
        }
        Ok(videos)
    }

    async fn formats(&self, url: &str) -> Result<Vec<FormatInfo>> {
        self.ytdlp.formats(url, &self.options).await
    }

    async fn download_video(&self, url: &str) -> Result<PathBuf> {
        ensure_output_dir(&self.options.output_dir).await?;
        let template = self.output_template();

        match self.ytdlp.download(url, &self.options, &template, None).await {
            Err(AbedlError::FormatUnavailable(message)) => {
                let fallback = self.fallback_format();
                warn!("Requested format unavailable ({}), retrying with '{}'", message, fallback);
                self.ytdlp
                    .download(url, &self.options, &template, Some(fallback))
                    .await
                    .map_err(|e| match e {
                        AbedlError::FormatUnavailable(_) => AbedlError::FormatUnavailable(format!(
                            "fallback format '{}' also failed: {}",
                            fallback, message
                        )),
                        other => other,
                    })
            }
            Err(AbedlError::BotDetection(message)) => {
                warn!("Bot detection triggered for {}", url);
                Err(AbedlError::BotDetection(message))
            }
            result => result,
        }
    }

    async fn download_playlist(&self, url: &str) -> Result<Vec<PathBuf>> {
        let videos = self.playlist_info(url).await?;
        info!("Found {} videos in playlist", videos.len());

        let selected = select_entries(&videos, &self.options);
        if selected.is_empty() {
            info!("No videos to download after applying filters");
            return Ok(Vec::new());
        }
        if selected.len() != videos.len() {
            info!(
                "Downloading {} videos (filtered from {} total)",
                selected.len(),
                videos.len()
            );
        }

        let total = selected.len();
        let mut files = Vec::with_capacity(total);
        for (i, video) in selected.iter().enumerate() {
            info!("Downloading video {}/{}: {}", i + 1, total, video.title);
            match self.download_video(&video.url).await {
                Ok(path) => files.push(path),
                Err(e) => warn!("Failed to download '{}': {}", video.title, e),
            }
        }

        Ok(files)
    }
}
