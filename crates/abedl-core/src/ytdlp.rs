//! yt-dlp process runner
//!
//! Translates [`DownloadOptions`] into yt-dlp command lines, runs the binary
//! and decodes its JSON output. Failures are classified from stderr so
//! callers can react to bot detection or missing formats.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::client::BROWSER_USER_AGENT;
use crate::error::{AbedlError, Result};
use crate::tools::find_binary;
use crate::types::{DownloadOptions, FormatInfo, VideoInfo};

const TOOL: &str = "yt-dlp";

/// Metadata queries should never take this long
const QUERY_TIMEOUT: Duration = Duration::from_secs(180);

/// Flat playlist listings stop after this many entries
pub const PLAYLIST_LIMIT: usize = 100;

static BOT_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bbot\b").expect("valid regex"));

/// Builds the yt-dlp `-f` selector for the requested quality
///
/// Heights such as `"720p"` prefer that height, then anything up to 100
/// lines taller, then whatever is best.
///
/// # Example
/// ```
/// use abedl_core::{DownloadOptions, ytdlp::format_selector};
/// let options = DownloadOptions { quality: "720p".into(), ..Default::default() };
/// assert_eq!(format_selector(&options), "best[height<=720]/best[height<=820]/best");
/// ```
pub fn format_selector(options: &DownloadOptions) -> String {
    if options.audio_only {
        return "bestaudio/best".to_string();
    }

    let quality = options.quality.trim();
    match quality.to_ascii_lowercase().as_str() {
        "" | "best" => "best".to_string(),
        "worst" => "worst".to_string(),
        other => match other.trim_end_matches('p').parse::<u32>() {
            Ok(height) => format!(
                "best[height<={}]/best[height<={}]/best",
                height,
                height.saturating_add(100)
            ),
            Err(_) => {
                warn!("Unrecognised quality '{}', using best", quality);
                "best".to_string()
            }
        },
    }
}

/// Top-level and entry objects from `yt-dlp -J`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YtDlpInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub webpage_url: Option<String>,
    pub duration: Option<f64>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub upload_date: Option<String>,
    pub view_count: Option<u64>,
    pub thumbnail: Option<String>,
    pub ext: Option<String>,
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub formats: Vec<YtDlpFormat>,
    #[serde(default)]
    pub entries: Vec<Option<YtDlpInfo>>,
}

impl YtDlpInfo {
    /// Converts to [`VideoInfo`], keeping `url` as the page address
    pub fn to_video_info(&self, url: &str) -> VideoInfo {
        VideoInfo {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| "Unknown Title".to_string()),
            url: url.to_string(),
            duration: self.duration.map(|d| d.round() as u64),
            description: self.description.clone(),
            uploader: self.uploader.clone().or_else(|| self.channel.clone()),
            upload_date: self.upload_date.clone(),
            view_count: self.view_count,
            thumbnail_url: self.thumbnail.clone(),
        }
    }

    pub fn format_infos(&self) -> Vec<FormatInfo> {
        self.formats.iter().map(YtDlpFormat::to_format_info).collect()
    }
}

/// One entry of the `formats` array
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YtDlpFormat {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub filesize: Option<f64>,
    pub filesize_approx: Option<f64>,
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub format_note: Option<String>,
}

impl YtDlpFormat {
    fn to_format_info(&self) -> FormatInfo {
        FormatInfo {
            format_id: self.format_id.clone().unwrap_or_default(),
            ext: self.ext.clone().unwrap_or_default(),
            resolution: self.resolution.clone(),
            filesize: self.filesize.or(self.filesize_approx).map(|s| s as u64),
            fps: self.fps,
            vcodec: self.vcodec.clone(),
            acodec: self.acodec.clone(),
            format_note: self.format_note.clone(),
        }
    }
}

/// Maps a failed run's stderr to the most specific error
///
/// Only `ERROR:` lines are inspected, so warnings such as "Some formats may
/// be missing" never decide the category.
pub fn classify_failure(stderr: &str) -> AbedlError {
    let errors: Vec<&str> = stderr
        .lines()
        .filter(|line| line.trim_start().starts_with("ERROR:"))
        .collect();
    let lower = if errors.is_empty() {
        stderr.to_lowercase()
    } else {
        errors.join("\n").to_lowercase()
    };
    let message = error_line(stderr);

    if BOT_WORD.is_match(&lower) || lower.contains("sign in") {
        AbedlError::BotDetection(message)
    } else if lower.contains("unsupported url") || lower.contains("is not a valid url") {
        AbedlError::InvalidUrl(message)
    } else if lower.contains("format") {
        AbedlError::FormatUnavailable(message)
    } else {
        AbedlError::tool_failed(TOOL, message)
    }
}

/// Last `ERROR:` line, or the whole trimmed text when there is none
fn error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|line| line.trim_start().starts_with("ERROR:"))
        .map(|line| line.trim().trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| stderr.trim().to_string())
}

/// Decodes `-J` output
fn parse_info(stdout: &str) -> Result<YtDlpInfo> {
    serde_json::from_str(stdout)
        .map_err(|e| AbedlError::ParseError(format!("unexpected yt-dlp output: {}", e)))
}

/// Captured output of a successful run
struct RunOutput {
    stdout: String,
}

/// Handle to a yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    retries: u32,
    user_agent: String,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlp {
    /// Uses the first yt-dlp found on the system, or `yt-dlp` on `PATH`
    pub fn new() -> Self {
        let binary = find_binary(TOOL).unwrap_or_else(|| PathBuf::from(TOOL));
        Self::with_binary(binary)
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            retries: 3,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }

    /// Sets extractor and fragment retry counts
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments for downloading one video, without the URL
    ///
    /// `format_override` replaces the selector derived from `options`.
    pub fn download_args(
        &self,
        options: &DownloadOptions,
        output_template: &str,
        format_override: Option<&str>,
    ) -> Vec<String> {
        let format = format_override
            .map(str::to_string)
            .unwrap_or_else(|| format_selector(options));

        let mut args = vec![
            "--no-playlist".to_string(),
            "-f".to_string(),
            format,
            "-o".to_string(),
            output_template.to_string(),
        ];

        if options.write_info_json {
            args.push("--write-info-json".to_string());
        }
        if options.write_thumbnail {
            args.push("--write-thumbnail".to_string());
        }
        if options.subtitles {
            args.push("--write-subs".to_string());
        }
        if options.embed_subtitles {
            args.push("--embed-subs".to_string());
        }

        if options.audio_only {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(
                options
                    .audio_format
                    .clone()
                    .unwrap_or_else(|| "best".to_string()),
            );
        } else if let Some(container) = &options.video_format {
            args.push("--remux-video".to_string());
            args.push(container.clone());
        }

        args.extend(self.common_args(options));
        args.push("--print".to_string());
        args.push("after_move:filepath".to_string());
        args
    }

    /// Anti-bot headers, retry policy and cookies shared by every call
    fn common_args(&self, options: &DownloadOptions) -> Vec<String> {
        let mut args = vec![
            "--user-agent".to_string(),
            self.user_agent.clone(),
            "--extractor-retries".to_string(),
            self.retries.to_string(),
            "--fragment-retries".to_string(),
            self.retries.to_string(),
            "--retry-sleep".to_string(),
            "extractor:linear=2::1".to_string(),
            "--retry-sleep".to_string(),
            "fragment:linear=2::1".to_string(),
        ];

        if let Some(browser) = &options.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        } else if let Some(file) = &options.cookies {
            args.push("--cookies".to_string());
            args.push(file.to_string_lossy().into_owned());
        }

        args
    }

    /// Full metadata for a single video
    pub async fn video_info(&self, url: &str, options: &DownloadOptions) -> Result<YtDlpInfo> {
        let mut args = vec!["-J".to_string(), "--no-playlist".to_string()];
        args.extend(self.common_args(options));
        args.push(url.to_string());

        let output = self.run(&args, Some(QUERY_TIMEOUT)).await?;
        parse_info(&output.stdout)
    }

    /// Flat listing of a playlist, up to [`PLAYLIST_LIMIT`] entries
    pub async fn playlist(&self, url: &str, options: &DownloadOptions) -> Result<YtDlpInfo> {
        let mut args = vec![
            "-J".to_string(),
            "--flat-playlist".to_string(),
            "--ignore-errors".to_string(),
            "--playlist-end".to_string(),
            PLAYLIST_LIMIT.to_string(),
        ];
        args.extend(self.common_args(options));
        args.push(url.to_string());

        let output = self.run(&args, Some(QUERY_TIMEOUT)).await?;
        parse_info(&output.stdout)
    }

    /// Formats offered for a single video
    pub async fn formats(&self, url: &str, options: &DownloadOptions) -> Result<Vec<FormatInfo>> {
        Ok(self.video_info(url, options).await?.format_infos())
    }

    /// Downloads one video and returns the final file path
    pub async fn download(
        &self,
        url: &str,
        options: &DownloadOptions,
        output_template: &str,
        format_override: Option<&str>,
    ) -> Result<PathBuf> {
        let mut args = self.download_args(options, output_template, format_override);
        args.push(url.to_string());

        info!("Running yt-dlp for {}", url);
        let output = self.run(&args, None).await?;

        output
            .stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AbedlError::tool_failed(TOOL, "no output file was reported"))
    }

    /// Runs yt-dlp, relaying stderr to the log while it runs
    async fn run(&self, args: &[String], timeout: Option<Duration>) -> Result<RunOutput> {
        debug!("{} {}", self.binary.display(), args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AbedlError::ToolNotFound(format!(
                    "{} ({})",
                    TOOL,
                    self.binary.display()
                )),
                _ => AbedlError::Io(e),
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| AbedlError::tool_failed(TOOL, "stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AbedlError::tool_failed(TOOL, "stderr was not captured"))?;

        let work = async {
            let read_stdout = async {
                let mut buf = String::new();
                stdout.read_to_string(&mut buf).await.map(|_| buf)
            };
            let read_stderr = async {
                let mut lines = BufReader::new(stderr).lines();
                let mut collected = String::new();
                while let Some(line) = lines.next_line().await? {
                    if line.starts_with("WARNING:") {
                        warn!("{}", line.trim_start_matches("WARNING:").trim());
                    } else {
                        debug!("yt-dlp: {}", line);
                    }
                    collected.push_str(&line);
                    collected.push('\n');
                }
                Ok::<_, std::io::Error>(collected)
            };

            let (out, err) = tokio::join!(read_stdout, read_stderr);
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, out?, err?))
        };

        let (status, stdout, stderr) = match timeout {
            Some(limit) => tokio::time::timeout(limit, work).await.map_err(|_| {
                AbedlError::tool_failed(TOOL, format!("timed out after {:?}", limit))
            })??,
            None => work.await?,
        };

        if !status.success() {
            return Err(classify_failure(&stderr));
        }

        Ok(RunOutput { stdout })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> DownloadOptions {
        DownloadOptions::default()
    }

    fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_format_selector_best_and_worst() {
        assert_eq!(format_selector(&options()), "best");
        let worst = DownloadOptions {
            quality: "worst".to_string(),
            ..options()
        };
        assert_eq!(format_selector(&worst), "worst");
    }

    #[test]
    fn test_format_selector_height() {
        let hd = DownloadOptions {
            quality: "1080p".to_string(),
            ..options()
        };
        assert_eq!(
            format_selector(&hd),
            "best[height<=1080]/best[height<=1180]/best"
        );
    }

    #[test]
    fn test_format_selector_audio_only_wins() {
        let audio = DownloadOptions {
            audio_only: true,
            quality: "720p".to_string(),
            ..options()
        };
        assert_eq!(format_selector(&audio), "bestaudio/best");
    }

    #[test]
    fn test_format_selector_garbage_falls_back() {
        let odd = DownloadOptions {
            quality: "ultra".to_string(),
            ..options()
        };
        assert_eq!(format_selector(&odd), "best");
    }

    #[test]
    fn test_download_args_defaults() {
        let ytdlp = YtDlp::with_binary("yt-dlp");
        let args = ytdlp.download_args(&options(), "out/%(title)s.%(ext)s", None);

        assert_eq!(flag_value(&args, "-f"), Some("best"));
        assert_eq!(flag_value(&args, "-o"), Some("out/%(title)s.%(ext)s"));
        assert_eq!(flag_value(&args, "--extractor-retries"), Some("3"));
        assert_eq!(flag_value(&args, "--print"), Some("after_move:filepath"));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"-x".to_string()));
        assert!(!args.contains(&"--write-subs".to_string()));
    }

    #[test]
    fn test_download_args_audio() {
        let ytdlp = YtDlp::with_binary("yt-dlp");
        let audio = DownloadOptions {
            audio_only: true,
            audio_format: Some("mp3".to_string()),
            video_format: Some("mp4".to_string()),
            ..options()
        };
        let args = ytdlp.download_args(&audio, "%(title)s.%(ext)s", None);

        assert!(args.contains(&"-x".to_string()));
        assert_eq!(flag_value(&args, "--audio-format"), Some("mp3"));
        assert_eq!(flag_value(&args, "-f"), Some("bestaudio/best"));
        assert!(!args.contains(&"--remux-video".to_string()));
    }

    #[test]
    fn test_download_args_audio_without_codec() {
        let ytdlp = YtDlp::with_binary("yt-dlp");
        let audio = DownloadOptions {
            audio_only: true,
            ..options()
        };
        let args = ytdlp.download_args(&audio, "%(title)s.%(ext)s", None);
        assert_eq!(flag_value(&args, "--audio-format"), Some("best"));
    }

    #[test]
    fn test_download_args_extras_and_override() {
        let ytdlp = YtDlp::with_binary("yt-dlp").retries(5);
        let opts = DownloadOptions {
            subtitles: true,
            embed_subtitles: true,
            write_info_json: true,
            write_thumbnail: true,
            video_format: Some("mkv".to_string()),
            ..options()
        };
        let args = ytdlp.download_args(&opts, "x", Some("bestaudio"));

        assert_eq!(flag_value(&args, "-f"), Some("bestaudio"));
        assert_eq!(flag_value(&args, "--remux-video"), Some("mkv"));
        assert_eq!(flag_value(&args, "--fragment-retries"), Some("5"));
        for flag in ["--write-subs", "--embed-subs", "--write-info-json", "--write-thumbnail"] {
            assert!(args.contains(&flag.to_string()), "missing {}", flag);
        }
    }

    #[test]
    fn test_browser_cookies_take_precedence() {
        let ytdlp = YtDlp::with_binary("yt-dlp");
        let opts = DownloadOptions {
            cookies_from_browser: Some("firefox".to_string()),
            cookies: Some(PathBuf::from("cookies.txt")),
            ..options()
        };
        let args = ytdlp.download_args(&opts, "x", None);
        assert_eq!(flag_value(&args, "--cookies-from-browser"), Some("firefox"));
        assert!(flag_value(&args, "--cookies").is_none());
    }

    #[test]
    fn test_cookie_file() {
        let ytdlp = YtDlp::with_binary("yt-dlp");
        let opts = DownloadOptions {
            cookies: Some(PathBuf::from("./cookies.txt")),
            ..options()
        };
        let args = ytdlp.download_args(&opts, "x", None);
        assert_eq!(flag_value(&args, "--cookies"), Some("./cookies.txt"));
    }

    #[test]
    fn test_parse_video_json() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "duration": 212.0,
            "uploader": "Rick Astley",
            "upload_date": "20091025",
            "view_count": 1500000000,
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
            "formats": [
                {"format_id": "18", "ext": "mp4", "resolution": "640x360", "filesize": 11000000,
                 "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "fps": 25},
                {"format_id": "140", "ext": "m4a", "resolution": "audio only",
                 "filesize_approx": 3400000.5, "vcodec": "none", "acodec": "mp4a.40.2"}
            ]
        }"#;

        let info: YtDlpInfo = serde_json::from_str(json).unwrap();
        let video = info.to_video_info("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(video.title, "Never Gonna Give You Up");
        assert_eq!(video.duration, Some(212));
        assert_eq!(video.view_count, Some(1_500_000_000));
        assert_eq!(video.url, "https://youtu.be/dQw4w9WgXcQ");

        let formats = info.format_infos();
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].filesize, Some(11_000_000));
        assert_eq!(formats[1].filesize, Some(3_400_000));
        assert_eq!(formats[1].vcodec.as_deref(), Some("none"));
    }

    #[test]
    fn test_parse_flat_playlist_json() {
        let json = r#"{
            "_type": "playlist",
            "title": "Mix",
            "entries": [
                {"_type": "url", "id": "a1", "url": "https://www.youtube.com/watch?v=a1", "title": "One"},
                null,
                {"_type": "url", "id": "b2", "title": "Two", "duration": 61.4, "channel": "Chan"}
            ]
        }"#;

        let info: YtDlpInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.kind.as_deref(), Some("playlist"));
        assert_eq!(info.entries.len(), 3);
        assert!(info.entries[1].is_none());

        let second = info.entries[2].as_ref().unwrap().to_video_info("x");
        assert_eq!(second.uploader.as_deref(), Some("Chan"));
        assert_eq!(second.duration, Some(61));
    }

    #[test]
    fn test_garbage_output_is_parse_error() {
        let result = parse_info("Traceback (most recent call last):");
        assert!(matches!(result, Err(AbedlError::ParseError(_))));
    }

    #[test]
    fn test_missing_title_defaults() {
        let info: YtDlpInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info.to_video_info("u").title, "Unknown Title");
    }

    #[test]
    fn test_classify_bot_detection() {
        let stderr = "WARNING: something\nERROR: [youtube] abc: Sign in to confirm you're not a bot\n";
        match classify_failure(stderr) {
            AbedlError::BotDetection(msg) => assert!(msg.starts_with("[youtube] abc")),
            other => panic!("Expected BotDetection, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_format() {
        let stderr = "ERROR: [youtube] abc: Requested format is not available. Use --list-formats";
        assert!(matches!(
            classify_failure(stderr),
            AbedlError::FormatUnavailable(_)
        ));
    }

    #[test]
    fn test_classify_unsupported_url() {
        let stderr = "ERROR: Unsupported URL: https://example.com/";
        assert!(matches!(classify_failure(stderr), AbedlError::InvalidUrl(_)));
    }

    #[test]
    fn test_classify_does_not_match_bot_inside_words() {
        let stderr = "ERROR: Unable to download webpage: both attempts failed";
        assert!(matches!(
            classify_failure(stderr),
            AbedlError::ToolFailed { .. }
        ));
    }

    #[test]
    fn test_classify_ignores_warnings() {
        let stderr = "WARNING: [youtube] abc: Some formats may be missing\n\
                      WARNING: [youtube] Sign in for a better experience\n\
                      ERROR: [youtube] abc: Video unavailable\n";
        match classify_failure(stderr) {
            AbedlError::ToolFailed { message, .. } => {
                assert_eq!(message, "[youtube] abc: Video unavailable")
            }
            other => panic!("Expected ToolFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_without_error_lines_uses_everything() {
        assert!(matches!(
            classify_failure("Requested format is not available\n"),
            AbedlError::FormatUnavailable(_)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_reports_final_path() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake::script(dir.path(), "printf '\\n/videos/Clip.mp4\\n\\n'");

        let path = ytdlp
            .download("https://youtu.be/abc", &options(), "%(title)s.%(ext)s", None)
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/videos/Clip.mp4"));

        let calls = fake::calls(dir.path());
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains("--print after_move:filepath"));
        assert!(calls[0].ends_with("https://youtu.be/abc"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_download_without_reported_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake::script(dir.path(), "exit 0");

        let result = ytdlp.download("https://youtu.be/abc", &options(), "x", None).await;
        assert!(matches!(result, Err(AbedlError::ToolFailed { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_video_info_decodes_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake::script(
            dir.path(),
            r#"echo '{"id": "abc", "title": "Clip", "duration": 9.6}'"#,
        );

        let info = ytdlp.video_info("https://youtu.be/abc", &options()).await.unwrap();
        assert_eq!(info.title.as_deref(), Some("Clip"));
        assert_eq!(info.to_video_info("u").duration, Some(10));
        assert!(fake::calls(dir.path())[0].starts_with("-J --no-playlist"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = fake::script(
            dir.path(),
            "echo 'ERROR: Unsupported URL: https://example.com/' >&2\nexit 1",
        );

        let result = ytdlp.video_info("https://example.com/", &options()).await;
        assert!(matches!(result, Err(AbedlError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_not_found() {
        let ytdlp = YtDlp::with_binary("/nonexistent/yt-dlp");
        let result = ytdlp.video_info("https://youtu.be/x", &options()).await;
        assert!(matches!(result, Err(AbedlError::ToolNotFound(_))));
    }
}
