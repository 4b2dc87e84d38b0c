//! User configuration file
//!
//! Stored as JSON at `~/.config/abedl/config.json` (or the platform's config
//! directory). Missing keys take their default value, so older files keep
//! working as fields are added.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::ClientConfig;
use crate::error::{AbedlError, Result};
use crate::registry::DownloaderContext;
use crate::types::DownloadOptions;
use crate::ytdlp::YtDlp;

/// Persistent defaults for ABEDL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub default_output_dir: PathBuf,
    pub default_quality: String,
    /// Codec for audio extraction; `None` keeps the native codec
    pub default_audio_format: Option<String>,
    /// Container to remux into; `None` keeps whatever the site serves
    pub default_video_format: Option<String>,
    pub write_info_json: bool,
    pub write_thumbnail: bool,
    pub subtitles: bool,
    pub embed_subtitles: bool,
    pub retry_attempts: u32,
    /// User-Agent for direct HTTP requests
    pub user_agent: String,
    /// Browser to read cookies from on every yt-dlp call
    pub cookies_from_browser: Option<String>,
    /// Explicit yt-dlp binary, overriding detection
    pub ytdlp_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_output_dir: PathBuf::from("./downloads"),
            default_quality: "best".to_string(),
            default_audio_format: None,
            default_video_format: None,
            write_info_json: false,
            write_thumbnail: false,
            subtitles: false,
            embed_subtitles: false,
            retry_attempts: 3,
            user_agent: format!("ABEDL/{}", env!("CARGO_PKG_VERSION")),
            cookies_from_browser: None,
            ytdlp_path: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("abedl").join("config.json"))
    }

    /// Loads the config from the default location
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads the config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not load config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reads and parses `path`, reporting errors
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| AbedlError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Writes the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Download options seeded from this config
    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            output_dir: self.default_output_dir.clone(),
            quality: self.default_quality.clone(),
            audio_format: self.default_audio_format.clone(),
            video_format: self.default_video_format.clone(),
            subtitles: self.subtitles,
            embed_subtitles: self.embed_subtitles,
            write_info_json: self.write_info_json,
            write_thumbnail: self.write_thumbnail,
            cookies_from_browser: self.cookies_from_browser.clone(),
            ..Default::default()
        }
    }

    /// yt-dlp handle and HTTP settings derived from this config
    pub fn downloader_context(&self) -> DownloaderContext {
        let ytdlp = match &self.ytdlp_path {
            Some(path) => YtDlp::with_binary(path.clone()),
            None => YtDlp::new(),
        };

        DownloaderContext {
            ytdlp: ytdlp.retries(self.retry_attempts),
            http: ClientConfig {
                user_agent: self.user_agent.clone(),
                max_retries: self.retry_attempts,
                ..Default::default()
            },
        }
    }
}
