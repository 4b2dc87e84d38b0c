//! Devotional page parser for keysforkids.org
//!
//! Pulls the MP3 address and descriptive metadata out of a devotional page,
//! and locates devotional links on the archive listing.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::url::last_path_segment;

static MP3_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+\.mp3"#).expect("valid regex"));
static LONG_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+ \d+, \d{4})").expect("valid regex"));
static VERSE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+:\d+").expect("valid regex"));
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Podcast player host path preferred over other MP3 links
const PLAYER_PATH: &str = "keysforkids.org/podcast-player/";

/// How far past the date text the archive link may appear
const LINK_WINDOW: usize = 1000;

/// Metadata scraped from one devotional page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevotionalMetadata {
    pub url: String,
    pub title: Option<String>,
    /// Date text as shown on the page, or the URL slug when none is shown
    pub date: Option<String>,
    /// Scripture reference, e.g. "John 3:16"
    pub verse: Option<String>,
}

/// Finds the devotional's MP3 URL
///
/// The podcast-player link wins when several MP3s appear on the page.
///
/// # Example
/// ```
/// use abedl_core::parser::find_audio_url;
/// let html = r#"<audio src="https://cdn.example.com/ep.mp3"></audio>"#;
/// assert_eq!(find_audio_url(html).as_deref(), Some("https://cdn.example.com/ep.mp3"));
/// ```
pub fn find_audio_url(html: &str) -> Option<String> {
    let urls: Vec<&str> = MP3_URL.find_iter(html).map(|m| m.as_str()).collect();

    urls.iter()
        .find(|url| url.contains(PLAYER_PATH))
        .or_else(|| urls.first())
        .map(|url| url.to_string())
}

/// Extracts title, date and verse from a devotional page
///
/// # Arguments
/// * `html` - Raw HTML of the devotional page
/// * `url` - Address the page was fetched from
pub fn extract_metadata(html: &str, url: &str) -> DevotionalMetadata {
    let document = Html::parse_document(html);

    let title = Selector::parse("h1").ok().and_then(|sel| {
        document
            .select(&sel)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|text| !text.is_empty())
    });

    let date = LONG_DATE
        .captures(html)
        .map(|caps| caps[1].to_string())
        .or_else(|| last_path_segment(url));

    let verse = Selector::parse("a").ok().and_then(|sel| {
        document
            .select(&sel)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|text| VERSE_REF.is_match(text))
    });

    DevotionalMetadata {
        url: url.to_string(),
        title,
        date,
        verse,
    }
}

/// File name for a devotional, `{date}_{title}.mp3`
///
/// Dates shown as "November 10, 2025" become `2025-11-10`.
///
/// # Example
/// ```
/// use abedl_core::parser::{devotional_filename, DevotionalMetadata};
/// let meta = DevotionalMetadata {
///     title: Some("God's Love!".into()),
///     date: Some("November 10, 2025".into()),
///     ..Default::default()
/// };
/// assert_eq!(devotional_filename(&meta), "2025-11-10_Gods_Love.mp3");
/// ```
pub fn devotional_filename(meta: &DevotionalMetadata) -> String {
    let date = meta
        .date
        .as_deref()
        .map(|d| match parse_long_date(d) {
            Some(parsed) => parsed.format("%Y-%m-%d").to_string(),
            None => sanitize(d),
        })
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let title = meta
        .title
        .as_deref()
        .map(sanitize)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "devotional".to_string());

    format!("{}_{}.mp3", date, title)
}

/// Parses "November 10, 2025" in any letter case
pub fn parse_long_date(text: &str) -> Option<NaiveDate> {
    let mut chars = text.trim().chars();
    let first = chars.next()?;
    let normalized: String = first
        .to_uppercase()
        .chain(chars.as_str().to_lowercase().chars())
        .collect();
    NaiveDate::parse_from_str(&normalized, "%B %d, %Y").ok()
}

/// Finds the devotional link listed after `date_text` on an archive page
///
/// Only links within a short window after the first occurrence of the date
/// are considered, so neighbouring days are not picked up.
///
/// # Arguments
/// * `html` - Archive page HTML
/// * `date_text` - Date as the archive prints it, e.g. "November 3, 2025"
/// * `base_url` - Site root, e.g. `https://www.keysforkids.org`
pub fn find_devotional_link(html: &str, date_text: &str, base_url: &str) -> Option<String> {
    let start = html.find(date_text)?;
    let mut end = (start + LINK_WINDOW).min(html.len());
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    let window = &html[start..end];

    let pattern = format!(
        r#"href="({}/podcast/(?:keys-for-kids|default)/[^/"]+/)""#,
        regex::escape(base_url.trim_end_matches('/'))
    );
    let link = Regex::new(&pattern).ok()?;
    link.captures(window).map(|caps| caps[1].to_string())
}

fn sanitize(text: &str) -> String {
    UNSAFE_CHARS
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <header><a href="/">Home</a></header>
          <h1 class="entry-title">  The <em>Lost</em> Sheep </h1>
          <p class="date">November 10, 2025</p>
          <p>Read: <a href="/bible/luke-15">Luke 15:4-7</a></p>
          <a href="https://media.example.com/other.mp3">Other</a>
          <audio src="https://www.keysforkids.org/podcast-player/12345/lost-sheep.mp3"></audio>
        </body></html>
    "#;

    #[test]
    fn test_find_audio_prefers_player() {
        assert_eq!(
            find_audio_url(PAGE).as_deref(),
            Some("https://www.keysforkids.org/podcast-player/12345/lost-sheep.mp3")
        );
    }

    #[test]
    fn test_find_audio_none() {
        assert_eq!(find_audio_url("<html><p>No audio</p></html>"), None);
    }

    #[test]
    fn test_extract_metadata() {
        let meta = extract_metadata(PAGE, "https://www.keysforkids.org/podcast/keys-for-kids/lost-sheep/");
        assert_eq!(meta.title.as_deref(), Some("The Lost Sheep"));
        assert_eq!(meta.date.as_deref(), Some("November 10, 2025"));
        assert_eq!(meta.verse.as_deref(), Some("Luke 15:4-7"));
    }

    #[test]
    fn test_extract_metadata_falls_back_to_slug() {
        let html = "<html><h1>Untitled</h1></html>";
        let meta = extract_metadata(html, "https://www.keysforkids.org/podcast/default/brave-heart/");
        assert_eq!(meta.date.as_deref(), Some("brave-heart"));
        assert_eq!(meta.verse, None);
    }

    #[test]
    fn test_extract_metadata_missing_title() {
        let meta = extract_metadata("<html><p>x</p></html>", "https://x.org/a/");
        assert_eq!(meta.title, None);
    }

    #[test]
    fn test_filename_from_slug_date() {
        let meta = DevotionalMetadata {
            title: Some("Brave  Heart".to_string()),
            date: Some("brave-heart".to_string()),
            ..Default::default()
        };
        assert_eq!(devotional_filename(&meta), "brave-heart_Brave_Heart.mp3");
    }

    #[test]
    fn test_filename_defaults() {
        assert_eq!(
            devotional_filename(&DevotionalMetadata::default()),
            "unknown_devotional.mp3"
        );
    }

    #[test]
    fn test_parse_long_date_any_case() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7);
        assert_eq!(parse_long_date("March 7, 2025"), expected);
        assert_eq!(parse_long_date("MARCH 7, 2025"), expected);
        assert_eq!(parse_long_date("Smarch 7, 2025"), None);
    }

    #[test]
    fn test_find_devotional_link() {
        let html = r#"
            <div><span>November 3, 2025</span>
              <a href="https://www.keysforkids.org/podcast/keys-for-kids/a-new-song/">A New Song</a></div>
            <div><span>November 2, 2025</span>
              <a href="https://www.keysforkids.org/podcast/default/older-one/">Older</a></div>
        "#;
        let base = "https://www.keysforkids.org";
        assert_eq!(
            find_devotional_link(html, "November 3, 2025", base).as_deref(),
            Some("https://www.keysforkids.org/podcast/keys-for-kids/a-new-song/")
        );
        assert_eq!(
            find_devotional_link(html, "November 2, 2025", base).as_deref(),
            Some("https://www.keysforkids.org/podcast/default/older-one/")
        );
        assert_eq!(find_devotional_link(html, "November 4, 2025", base), None);
    }

    #[test]
    fn test_find_devotional_link_outside_window() {
        let padding = "x".repeat(LINK_WINDOW + 10);
        let html = format!(
            r#"November 3, 2025{}<a href="https://www.keysforkids.org/podcast/keys-for-kids/late/">"#,
            padding
        );
        assert_eq!(
            find_devotional_link(&html, "November 3, 2025", "https://www.keysforkids.org"),
            None
        );
    }

    #[test]
    fn test_find_devotional_link_multibyte_window() {
        let padding = "é".repeat(LINK_WINDOW);
        let html = format!("May 1, 2024{}", padding);
        assert_eq!(find_devotional_link(&html, "May 1, 2024", "https://www.keysforkids.org"), None);
    }
}
