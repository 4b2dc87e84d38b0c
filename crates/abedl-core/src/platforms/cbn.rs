//! CBN downloader
//!
//! Videos are fetched through yt-dlp and saved with media-server style names
//! such as `Flying House - E03 - The Good Samaritan.mp4`.

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::info;

use crate::downloader::{Downloader, ensure_output_dir, truncate_chars};
use crate::error::Result;
use crate::types::{DownloadOptions, FormatInfo, VideoInfo};
use crate::ytdlp::YtDlp;

static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:https?://)?(?:www\.)?cbn\.com/video/[\w-]+",
        r"(?i)^(?:https?://)?(?:www\.)?cbn\.com/shows/[\w-]+/[\w-]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static URL_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)flying-house-episode-(\d+)").expect("valid regex"));
static TITLE_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)episode\s*(\d+)").expect("valid regex"));
static SERIES_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)flying\s*house\s*-?\s*").expect("valid regex"));
static EPISODE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)episode\s*\d+\s*-?\s*").expect("valid regex"));
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-_. ]").expect("valid regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static DOUBLE_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\s*-").expect("valid regex"));

const EXAMPLE_URLS: &[&str] = &["https://www.cbn.com/video/flying-house-episode-1"];

const DEFAULT_SERIES: &str = "CBN Video";
/// Reported when yt-dlp names no uploader
const DEFAULT_UPLOADER: &str = "CBN";
const FLYING_HOUSE: &str = "Flying House";

/// Series, episode and title derived from a CBN page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeInfo {
    pub series: String,
    /// Formatted as `E03`
    pub episode: Option<String>,
    pub title: String,
}

/// Works out the episode naming for a CBN video
///
/// A description longer than three characters is taken as the episode title,
/// since CBN puts the real name there and a generic one in the title.
pub fn parse_episode_info(url: &str, title: &str, description: &str) -> EpisodeInfo {
    let description = description.trim();
    let episode_title = if description.chars().count() > 3 {
        description
    } else {
        title
    };

    let from_url = URL_EPISODE.captures(url).map(|caps| caps[1].to_string());
    let series = if from_url.is_some() {
        FLYING_HOUSE
    } else {
        DEFAULT_SERIES
    };

    let number = from_url.or_else(|| TITLE_EPISODE.captures(title).map(|caps| caps[1].to_string()));
    let episode = number
        .and_then(|n| n.parse::<u32>().ok())
        .map(|n| format!("E{:02}", n));

    let stripped = SERIES_PREFIX.replace_all(episode_title, "");
    let stripped = EPISODE_PREFIX.replace_all(&stripped, "");
    let clean = stripped.trim_matches(|c| c == ' ' || c == '-');
    let title = if clean.is_empty() { episode_title } else { clean };

    EpisodeInfo {
        series: series.to_string(),
        episode,
        title: title.to_string(),
    }
}

/// Builds `Series - E01 - Title.ext`, or `Series - Title.ext` without an episode
pub fn episode_filename(info: &EpisodeInfo, ext: &str) -> String {
    let series = UNSAFE_CHARS.replace_all(&info.series, "");
    let title = UNSAFE_CHARS.replace_all(&info.title, "");

    let name = match &info.episode {
        Some(episode) => format!("{} - {} - {}.{}", series, episode, title, ext),
        None => format!("{} - {}.{}", series, title, ext),
    };

    let name = SPACES.replace_all(&name, " ");
    DOUBLE_DASH.replace_all(&name, "-").into_owned()
}

pub struct CbnDownloader {
    options: DownloadOptions,
    ytdlp: YtDlp,
}

impl CbnDownloader {
    pub fn new(options: DownloadOptions, ytdlp: YtDlp) -> Self {
        Self { options, ytdlp }
    }

    /// Extension the finished file will carry
    fn target_ext(&self, reported: Option<&str>) -> String {
        let preferred = if self.options.audio_only {
            self.options.audio_format.as_ref()
        } else {
            self.options.video_format.as_ref()
        };
        preferred
            .cloned()
            .unwrap_or_else(|| reported.unwrap_or("mp4").to_string())
    }
}

#[async_trait]
impl Downloader for CbnDownloader {
    fn name(&self) -> &'static str {
        "cbn"
    }

    fn example_urls(&self) -> &'static [&'static str] {
        EXAMPLE_URLS
    }

    fn can_handle(&self, url: &str) -> bool {
        URL_PATTERNS.iter().any(|re| re.is_match(url.trim()))
    }

    fn is_playlist(&self, _url: &str) -> bool {
        false
    }

    async fn video_info(&self, url: &str) -> Result<VideoInfo> {
        let info = self.ytdlp.video_info(url, &self.options).await?;
        let mut video = info.to_video_info(url);
        video.uploader = video.uploader.or_else(|| Some(DEFAULT_UPLOADER.to_string()));
        Ok(video)
    }

    async fn playlist_info(&self, url: &str) -> Result<Vec<VideoInfo>> {
        Ok(vec![self.video_info(url).await?])
    }

    async fn formats(&self, url: &str) -> Result<Vec<FormatInfo>> {
        self.ytdlp.formats(url, &self.options).await
    }

    async fn download_video(&self, url: &str) -> Result<PathBuf> {
        let info = self.ytdlp.video_info(url, &self.options).await?;
        let title = info.title.as_deref().unwrap_or(DEFAULT_SERIES);
        let description = info.description.as_deref().unwrap_or("");

        let episode = parse_episode_info(url, title, description);
        let filename = episode_filename(&episode, &self.target_ext(info.ext.as_deref()));

        info!("Downloading: {}", title);
        if !description.trim().is_empty() {
            info!("Description: {}", truncate_chars(description.trim(), 50));
        }
        info!("Saving as: {}", filename);

        ensure_output_dir(&self.options.output_dir).await?;
        // yt-dlp fills in the extension so audio extraction and remuxing land on the right name
        let stem = filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&filename);
        let template = self
            .options
            .output_dir
            .join(format!("{}.%(ext)s", stem))
            .to_string_lossy()
            .into_owned();

        self.ytdlp.download(url, &self.options, &template, None).await
    }

    async fn download_playlist(&self, url: &str) -> Result<Vec<PathBuf>> {
        Ok(vec![self.download_video(url).await?])
    }
}
