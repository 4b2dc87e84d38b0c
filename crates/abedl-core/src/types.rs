//! Core data types for ABEDL
//!
//! Contains the video metadata and download option structures shared by
//! every platform downloader.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Metadata about a single video or devotional
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Video title
    pub title: String,

    /// Page URL the video was resolved from
    pub url: String,

    /// Duration in seconds
    pub duration: Option<u64>,

    pub description: Option<String>,

    pub uploader: Option<String>,

    /// Upload date as reported by the source (yt-dlp uses "YYYYMMDD")
    pub upload_date: Option<String>,

    pub view_count: Option<u64>,

    pub thumbnail_url: Option<String>,
}

/// One downloadable format offered for a video
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormatInfo {
    pub format_id: String,
    pub ext: String,
    pub resolution: Option<String>,
    /// Exact or approximate size in bytes
    pub filesize: Option<u64>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub format_note: Option<String>,
}

/// Download configuration shared by all platform downloaders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// Directory downloaded files are written to
    pub output_dir: PathBuf,

    /// "best", "worst" or a height such as "720p"
    pub quality: String,

    pub audio_only: bool,

    /// Container for merged video (mp4, webm, ...)
    pub video_format: Option<String>,

    /// Codec for extracted audio (mp3, wav, ...)
    pub audio_format: Option<String>,

    pub subtitles: bool,
    pub embed_subtitles: bool,
    pub write_info_json: bool,
    pub write_thumbnail: bool,

    /// 1-based first playlist entry
    pub playlist_start: usize,

    /// 1-based last playlist entry, inclusive
    pub playlist_end: Option<usize>,

    /// Item spec such as "1,3,5-8"; overrides start/end when set
    pub playlist_items: Option<String>,

    /// Browser to read cookies from (chrome, firefox, safari, ...)
    pub cookies_from_browser: Option<String>,

    /// Netscape-format cookies file
    pub cookies: Option<PathBuf>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./downloads"),
            quality: "best".to_string(),
            audio_only: false,
            video_format: None,
            audio_format: None,
            subtitles: false,
            embed_subtitles: false,
            write_info_json: false,
            write_thumbnail: false,
            playlist_start: 1,
            playlist_end: None,
            playlist_items: None,
            cookies_from_browser: None,
            cookies: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_options_default() {
        let options = DownloadOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("./downloads"));
        assert_eq!(options.quality, "best");
        assert_eq!(options.playlist_start, 1);
        assert!(options.playlist_end.is_none());
        assert!(!options.audio_only);
    }

    #[test]
    fn test_video_info_serialization() {
        let video = VideoInfo {
            title: "Flying House - Episode 1".to_string(),
            url: "https://cbn.com/video/flying-house-episode-1".to_string(),
            duration: Some(1440),
            uploader: Some("CBN".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&video).expect("Serialization should succeed");
        let deserialized: VideoInfo =
            serde_json::from_str(&json).expect("Deserialization should succeed");

        assert_eq!(video, deserialized);
    }
}
