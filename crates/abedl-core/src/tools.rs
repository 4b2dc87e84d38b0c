//! Detection of the external programs ABEDL drives
//!
//! yt-dlp does the extraction work and ffmpeg is needed for audio
//! extraction, subtitle embedding and remuxing.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// External programs ABEDL knows how to probe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ToolType {
    YtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "--version",
            // ffmpeg only understands the single-dash form
            ToolType::Ffmpeg => "-version",
        }
    }

    /// Install hint shown when the tool is missing
    pub fn install_hint(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "Install: pip install yt-dlp (or brew install yt-dlp)",
            ToolType::Ffmpeg => {
                "Install: brew install ffmpeg (macOS) or apt install ffmpeg (Ubuntu)"
            }
        }
    }
}

/// Result of probing one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub tool_type: ToolType,
    pub path: Option<PathBuf>,
    /// First line of the tool's version output
    pub version: Option<String>,
}

impl ToolInfo {
    /// Found on disk and answered the version query
    pub fn is_available(&self) -> bool {
        self.path.is_some() && self.version.is_some()
    }
}

/// Finds an executable in well-known install locations, then on `PATH`
pub fn find_binary(name: &str) -> Option<PathBuf> {
    let file_name = if cfg!(target_os = "windows") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    };

    let common_dirs = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];
    let from_common = common_dirs
        .iter()
        .map(|dir| Path::new(dir).join(&file_name))
        .find(|candidate| candidate.is_file());

    from_common.or_else(|| {
        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    })
}

/// Locates `tool` and asks it for its version
pub async fn probe(tool: ToolType) -> ToolInfo {
    let path = find_binary(tool.as_str());
    let version = match &path {
        Some(path) => version_of(path, tool.version_arg()).await,
        None => None,
    };

    debug!("Probed {}: path={:?} version={:?}", tool.as_str(), path, version);
    ToolInfo {
        tool_type: tool,
        path,
        version,
    }
}

/// Probes every tool ABEDL uses
pub async fn probe_all() -> Vec<ToolInfo> {
    vec![probe(ToolType::YtDlp).await, probe(ToolType::Ffmpeg).await]
}

async fn version_of(path: &Path, arg: &str) -> Option<String> {
    let output = Command::new(path)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(VERSION_TIMEOUT, output).await {
        Ok(Ok(out)) if out.status.success() => first_line(&String::from_utf8_lossy(&out.stdout)),
        _ => None,
    }
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names() {
        assert_eq!(ToolType::YtDlp.as_str(), "yt-dlp");
        assert_eq!(ToolType::Ffmpeg.as_str(), "ffmpeg");
        assert_eq!(ToolType::Ffmpeg.version_arg(), "-version");
    }

    #[test]
    fn test_first_line() {
        let out = "\nffmpeg version 6.1.1 Copyright (c) 2000-2023\nbuilt with gcc\n";
        assert_eq!(
            first_line(out).as_deref(),
            Some("ffmpeg version 6.1.1 Copyright (c) 2000-2023")
        );
        assert_eq!(first_line("  \n"), None);
    }

    #[test]
    fn test_find_binary_missing() {
        assert!(find_binary("abedl-definitely-not-installed-tool").is_none());
    }

    #[test]
    fn test_tool_info_availability() {
        let info = ToolInfo {
            tool_type: ToolType::Ffmpeg,
            path: Some(PathBuf::from("/usr/bin/ffmpeg")),
            version: None,
        };
        assert!(!info.is_available());
    }

    #[tokio::test]
    async fn test_probe_missing_tool_has_no_version() {
        let version = version_of(Path::new("/nonexistent/abedl-tool"), "--version").await;
        assert!(version.is_none());
    }
}
