//! Common interface for platform downloaders

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FormatInfo, VideoInfo};

/// A downloader for one video platform
///
/// Implementations decide which URLs they accept and how single videos and
/// playlists are fetched. [`Downloader::download`] dispatches between the two.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Registry name, e.g. `"youtube"`
    fn name(&self) -> &'static str;

    /// Sample URLs shown by `abedl platforms`
    fn example_urls(&self) -> &'static [&'static str];

    /// Whether this downloader understands `url`
    fn can_handle(&self, url: &str) -> bool;

    /// Whether `url` points at a playlist rather than a single video
    fn is_playlist(&self, url: &str) -> bool {
        url.to_lowercase().contains("playlist") || url.contains("list=")
    }

    async fn video_info(&self, url: &str) -> Result<VideoInfo>;

    async fn playlist_info(&self, url: &str) -> Result<Vec<VideoInfo>>;

    async fn formats(&self, url: &str) -> Result<Vec<FormatInfo>>;

    /// Downloads one video and returns the written file
    async fn download_video(&self, url: &str) -> Result<PathBuf>;

    /// Downloads the selected entries of a playlist
    async fn download_playlist(&self, url: &str) -> Result<Vec<PathBuf>>;

    /// Downloads whatever `url` points at
    async fn download(&self, url: &str) -> Result<Vec<PathBuf>> {
        if self.is_playlist(url) {
            self.download_playlist(url).await
        } else {
            Ok(vec![self.download_video(url).await?])
        }
    }
}

/// Creates the output directory if it does not exist yet
pub(crate) async fn ensure_output_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Truncates to `max` characters, appending "..." when shortened
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records which download path was taken
    struct Recorder {
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl Downloader for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn example_urls(&self) -> &'static [&'static str] {
            &["https://example.com/v/1"]
        }

        fn can_handle(&self, url: &str) -> bool {
            url.contains("example.com")
        }

        async fn video_info(&self, url: &str) -> Result<VideoInfo> {
            Ok(VideoInfo {
                title: "t".to_string(),
                url: url.to_string(),
                ..Default::default()
            })
        }

        async fn playlist_info(&self, url: &str) -> Result<Vec<VideoInfo>> {
            Ok(vec![self.video_info(url).await?])
        }

        async fn formats(&self, _url: &str) -> Result<Vec<FormatInfo>> {
            Ok(Vec::new())
        }

        async fn download_video(&self, _url: &str) -> Result<PathBuf> {
            self.calls.lock().unwrap().push("video");
            Ok(PathBuf::from("one.mp4"))
        }

        async fn download_playlist(&self, _url: &str) -> Result<Vec<PathBuf>> {
            self.calls.lock().unwrap().push("playlist");
            Ok(vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")])
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            calls: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_default_is_playlist() {
        let d = recorder();
        assert!(d.is_playlist("https://example.com/playlist/9"));
        assert!(d.is_playlist("https://example.com/watch?v=1&list=PL1"));
        assert!(!d.is_playlist("https://example.com/v/1"));
    }

    #[tokio::test]
    async fn test_download_dispatches_single() {
        let d = recorder();
        let files = d.download("https://example.com/v/1").await.unwrap();
        assert_eq!(files, vec![PathBuf::from("one.mp4")]);
        assert_eq!(*d.calls.lock().unwrap(), vec!["video"]);
    }

    #[tokio::test]
    async fn test_download_dispatches_playlist() {
        let d = recorder();
        let files = d.download("https://example.com/Playlist/2").await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(*d.calls.lock().unwrap(), vec!["playlist"]);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }

    #[tokio::test]
    async fn test_ensure_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        ensure_output_dir(&target).await.unwrap();
        assert!(target.is_dir());
    }
}
