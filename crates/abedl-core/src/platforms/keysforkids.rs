//! Keys for Kids devotional downloader
//!
//! Devotional pages on keysforkids.org embed a direct MP3 link, so no
//! external tool is needed. Devotionals can also be looked up by date by
//! scanning the paginated archive.
//!
//! # Example
//!
//! ```no_run
//! use abedl_core::{ClientConfig, DownloadOptions, KeysForKidsDownloader, Result};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let kfk = KeysForKidsDownloader::new(DownloadOptions::default(), ClientConfig::default())?;
//!     let date = NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date");
//!     if let Some(path) = kfk.download_by_date(date).await? {
//!         println!("Saved {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::client::{ClientConfig, HttpClient};
use crate::downloader::{Downloader, ensure_output_dir};
use crate::error::{AbedlError, Result};
use crate::parser::{
    DevotionalMetadata, devotional_filename, extract_metadata, find_audio_url, find_devotional_link,
};
use crate::types::{DownloadOptions, FormatInfo, VideoInfo};
use crate::url::{archive_page_path, date_search_path, host_of};

const EXAMPLE_URLS: &[&str] = &["https://www.keysforkids.org/podcast/keys-for-kids/a-new-song/"];

/// Number of archive pages on the site
pub const DEFAULT_MAX_PAGES: u32 = 324;

/// Devotionals listed per archive page, roughly
const DAYS_PER_PAGE: i64 = 10;

/// Pages checked on each side of the estimate
const SEARCH_RADIUS: u32 = 5;

pub struct KeysForKidsDownloader {
    options: DownloadOptions,
    client: HttpClient,
    max_pages: u32,
}

impl KeysForKidsDownloader {
    pub fn new(options: DownloadOptions, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            options,
            client: HttpClient::with_config(config)?,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Limits how deep the archive search may go
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    async fn page_metadata(&self, url: &str) -> Result<(String, DevotionalMetadata)> {
        let html = self.client.fetch(url).await?;
        let meta = extract_metadata(&html, url);
        Ok((html, meta))
    }

    /// Finds the devotional page URL published on `date`
    ///
    /// Tries the site's date filter first, then pages of the archive around
    /// where the date should appear. Failing pages are skipped.
    ///
    /// # Returns
    /// `None` when no page mentions a devotional for that date
    pub async fn devotional_url_by_date(&self, date: NaiveDate) -> Result<Option<String>> {
        self.search_archive(date, Local::now().date_naive()).await
    }

    async fn search_archive(&self, date: NaiveDate, today: NaiveDate) -> Result<Option<String>> {
        let date_text = date.format("%B %-d, %Y").to_string();
        debug!("Searching for devotional dated {}", date_text);

        match self.client.fetch(&date_search_path(date)).await {
            Ok(html) => {
                if let Some(link) = find_devotional_link(&html, &date_text, self.client.base_url()) {
                    return Ok(Some(link));
                }
            }
            Err(e) => debug!("Date search failed: {}", e),
        }

        let estimated = estimate_page(date, today, self.max_pages);
        for page in pages_to_check(estimated, self.max_pages) {
            if let Some(link) = self.check_page(page, &date_text).await {
                info!("Found devotional for {} on archive page {}", date_text, page);
                return Ok(Some(link));
            }
        }

        Ok(None)
    }

    async fn check_page(&self, page: u32, date_text: &str) -> Option<String> {
        match self.client.fetch(&archive_page_path(page)).await {
            Ok(html) => find_devotional_link(&html, date_text, self.client.base_url()),
            Err(e) => {
                debug!("Archive page {} failed: {}", page, e);
                None
            }
        }
    }

    /// Downloads the devotional for `date`
    ///
    /// # Returns
    /// The saved file, or `None` when no devotional exists for that day
    pub async fn download_by_date(&self, date: NaiveDate) -> Result<Option<PathBuf>> {
        match self.devotional_url_by_date(date).await? {
            Some(url) => self.download_video(&url).await.map(Some),
            None => {
                info!("No devotional found for {}", date.format("%B %-d, %Y"));
                Ok(None)
            }
        }
    }

    /// Downloads every devotional from `start` to `end`, inclusive
    ///
    /// Days that fail or have no devotional are logged and skipped.
    pub async fn download_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for date in days_inclusive(start, end) {
            info!("--- Devotional for {} ---", date.format("%Y-%m-%d"));
            match self.download_by_date(date).await {
                Ok(Some(path)) => files.push(path),
                Ok(None) => {}
                Err(e) => warn!("Failed to download devotional for {}: {}", date, e),
            }
        }
        files
    }
}

/// Archive page where `date` most likely appears
pub fn estimate_page(date: NaiveDate, today: NaiveDate, max_pages: u32) -> u32 {
    let days_ago = (today - date).num_days().max(0);
    let page = (days_ago / DAYS_PER_PAGE).clamp(1, i64::from(max_pages.max(1)));
    page as u32
}

/// Estimated page first, then alternating neighbours out to the search radius
///
/// Page 1 is appended when the radius did not reach it.
pub fn pages_to_check(estimated: u32, max_pages: u32) -> Vec<u32> {
    let mut pages = vec![estimated];
    for offset in 1..=SEARCH_RADIUS {
        if let Some(before) = estimated.checked_sub(offset).filter(|p| *p >= 1) {
            pages.push(before);
        }
        let after = estimated + offset;
        if after <= max_pages {
            pages.push(after);
        }
    }
    if !pages.contains(&1) {
        pages.push(1);
    }
    pages
}

/// Every day from `start` through `end`; empty when `start` is later
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

#[async_trait]
impl Downloader for KeysForKidsDownloader {
    fn name(&self) -> &'static str {
        "keysforkids"
    }

    fn example_urls(&self) -> &'static [&'static str] {
        EXAMPLE_URLS
    }

    fn can_handle(&self, url: &str) -> bool {
        host_of(url).is_some_and(|host| host.contains("keysforkids.org"))
    }

    fn is_playlist(&self, _url: &str) -> bool {
        false
    }

    async fn video_info(&self, url: &str) -> Result<VideoInfo> {
        let (_, meta) = self.page_metadata(url).await?;
        Ok(VideoInfo {
            title: meta.title.unwrap_or_else(|| "Unknown Title".to_string()),
            url: url.to_string(),
            description: meta.verse,
            uploader: Some("Keys for Kids Ministries".to_string()),
            upload_date: meta.date,
            ..Default::default()
        })
    }

    async fn playlist_info(&self, url: &str) -> Result<Vec<VideoInfo>> {
        Ok(vec![self.video_info(url).await?])
    }

    async fn formats(&self, url: &str) -> Result<Vec<FormatInfo>> {
        let html = self.client.fetch(url).await?;
        if find_audio_url(&html).is_none() {
            return Err(AbedlError::NotFound(format!("No audio file found on page: {}", url)));
        }
        Ok(vec![FormatInfo {
            format_id: "mp3".to_string(),
            ext: "mp3".to_string(),
            resolution: Some("audio only".to_string()),
            vcodec: Some("none".to_string()),
            acodec: Some("mp3".to_string()),
            format_note: Some("podcast audio".to_string()),
            ..Default::default()
        }])
    }

    async fn download_video(&self, url: &str) -> Result<PathBuf> {
        let (html, meta) = self.page_metadata(url).await?;
        let audio_url = find_audio_url(&html)
            .ok_or_else(|| AbedlError::NotFound(format!("No audio file found on page: {}", url)))?;

        let filename = devotional_filename(&meta);
        info!("Downloading: {}", meta.title.as_deref().unwrap_or("devotional"));
        if let Some(verse) = &meta.verse {
            info!("Verse: {}", verse);
        }
        info!("Saving as: {}", filename);

        ensure_output_dir(&self.options.output_dir).await?;
        let dest = self.options.output_dir.join(filename);
        let bytes = self.client.download_to_file(&audio_url, &dest).await?;
        debug!("Wrote {} bytes to {}", bytes, dest.display());
        Ok(dest)
    }

    async fn download_playlist(&self, url: &str) -> Result<Vec<PathBuf>> {
        Ok(vec![self.download_video(url).await?])
    }
}
