//! URL helper functions
//!
//! Builders and parsers for YouTube watch/playlist URLs and for the Keys for
//! Kids archive paths.

use chrono::NaiveDate;
use reqwest::Url;

const YOUTUBE_BASE: &str = "https://www.youtube.com";

/// Archive listing path on keysforkids.org
pub const KFK_ARCHIVE_PATH: &str = "/podcasts/keys-for-kids/";

/// Builds a watch URL from a video ID
///
/// # Example
/// ```
/// use abedl_core::url::build_watch_url;
/// assert_eq!(build_watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
/// ```
pub fn build_watch_url(video_id: &str) -> String {
    format!("{}/watch?v={}", YOUTUBE_BASE, video_id)
}

/// Builds a playlist URL from a list ID
pub fn build_playlist_url(list_id: &str) -> String {
    format!("{}/playlist?list={}", YOUTUBE_BASE, list_id)
}

/// Parses `url`, assuming https when the scheme is missing
pub fn parse_lenient(url: &str) -> Option<Url> {
    let trimmed = url.trim();
    if trimmed.contains("://") {
        Url::parse(trimmed).ok()
    } else {
        Url::parse(&format!("https://{}", trimmed)).ok()
    }
}

/// Returns the value of the `list` query parameter, if any
pub fn extract_playlist_id(url: &str) -> Option<String> {
    let parsed = parse_lenient(url)?;
    parsed
        .query_pairs()
        .find(|(key, value)| key == "list" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Rewrites `watch?v=..&list=..` into a plain playlist URL
///
/// URLs carrying only one of the two parameters are returned unchanged.
///
/// # Example
/// ```
/// use abedl_core::url::normalize_playlist_url;
/// let url = normalize_playlist_url("https://www.youtube.com/watch?v=x1&list=PL9");
/// assert_eq!(url, "https://www.youtube.com/playlist?list=PL9");
/// ```
pub fn normalize_playlist_url(url: &str) -> String {
    let Some(parsed) = parse_lenient(url) else {
        return url.to_string();
    };

    let has_video = parsed.query_pairs().any(|(key, _)| key == "v");
    match extract_playlist_id(url) {
        Some(list_id) if has_video => build_playlist_url(&list_id),
        _ => url.to_string(),
    }
}

/// Host name of `url`, lowercased
pub fn host_of(url: &str) -> Option<String> {
    parse_lenient(url)?.host_str().map(str::to_lowercase)
}

/// Path of a Keys for Kids archive page (1-based)
///
/// # Example
/// ```
/// use abedl_core::url::archive_page_path;
/// assert_eq!(archive_page_path(1), "/podcasts/keys-for-kids/");
/// assert_eq!(archive_page_path(3), "/podcasts/keys-for-kids/page/3/");
/// ```
pub fn archive_page_path(page: u32) -> String {
    if page <= 1 {
        KFK_ARCHIVE_PATH.to_string()
    } else {
        format!("{}page/{}/", KFK_ARCHIVE_PATH, page)
    }
}

/// Path of the archive filtered to a single date
pub fn date_search_path(date: NaiveDate) -> String {
    format!("{}?date={}", KFK_ARCHIVE_PATH, date.format("%Y-%m-%d"))
}

/// Last non-empty path segment, percent-decoded
pub fn last_path_segment(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() || segment.contains(':') {
        return None;
    }
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}
