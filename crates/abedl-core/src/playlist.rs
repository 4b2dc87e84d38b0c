//! Playlist item selection
//!
//! Parses item specs such as `"1,3,5-8,10"` and applies them, or the
//! start/end bounds, to a list of playlist entries.

use std::collections::BTreeSet;

use tracing::warn;

use crate::types::DownloadOptions;

/// Largest index accepted in an item spec
pub const MAX_PLAYLIST_INDEX: usize = 100_000;

/// Result of parsing a playlist item spec
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistItems {
    /// 1-based indices, ascending, without duplicates
    pub indices: Vec<usize>,

    /// Tokens that were skipped, as written by the user
    pub rejected: Vec<String>,
}

impl PlaylistItems {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Parses a comma-separated list of indices and inclusive ranges
///
/// Each token is either a positive integer (`"4"`) or two positive integers
/// joined by a hyphen (`"5-8"`, start not greater than end), none larger
/// than [`MAX_PLAYLIST_INDEX`]. Surrounding whitespace is ignored and empty
/// tokens are dropped silently. Any other token is logged, recorded in
/// [`PlaylistItems::rejected`] and skipped without affecting the rest of the
/// spec.
///
/// # Example
/// ```
/// use abedl_core::parse_playlist_items;
/// let items = parse_playlist_items("5-8,1,3,x");
/// assert_eq!(items.indices, vec![1, 3, 5, 6, 7, 8]);
/// assert_eq!(items.rejected, vec!["x".to_string()]);
/// ```
pub fn parse_playlist_items(spec: &str) -> PlaylistItems {
    let mut indices = BTreeSet::new();
    let mut rejected = Vec::new();

    for token in spec.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        match parse_token(token) {
            Some((start, end)) => indices.extend(start..=end),
            None => {
                if token.contains('-') {
                    warn!("Invalid range '{}', skipping", token);
                } else {
                    warn!("Invalid number '{}', skipping", token);
                }
                rejected.push(token.to_string());
            }
        }
    }

    PlaylistItems {
        indices: indices.into_iter().collect(),
        rejected,
    }
}

/// Parses one token into an inclusive `(start, end)` pair
fn parse_token(token: &str) -> Option<(usize, usize)> {
    let (start, end) = match token.split_once('-') {
        Some((start, end)) => (parse_index(start)?, parse_index(end)?),
        None => {
            let index = parse_index(token)?;
            (index, index)
        }
    };

    (start <= end).then_some((start, end))
}

fn parse_index(text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<usize>()
        .ok()
        .filter(|&n| (1..=MAX_PLAYLIST_INDEX).contains(&n))
}

/// Picks the playlist entries selected by `options`
///
/// When `playlist_items` is set, its 1-based entries are returned in
/// ascending order and indices past the end of the playlist are reported and
/// skipped; a spec with no valid index selects nothing. Otherwise the
/// `playlist_start..=playlist_end` window is used, clamped to the playlist
/// length.
pub fn select_entries<T: Clone>(entries: &[T], options: &DownloadOptions) -> Vec<T> {
    if entries.is_empty() {
        return Vec::new();
    }

    if let Some(spec) = options.playlist_items.as_deref() {
        let items = parse_playlist_items(spec);
        if items.is_empty() {
            warn!("No valid playlist items in '{}', no videos will be downloaded", spec);
            return Vec::new();
        }
        return items
            .indices
            .into_iter()
            .filter_map(|index| {
                let entry = entries.get(index - 1).cloned();
                if entry.is_none() {
                    warn!(
                        "Index {} is out of range (playlist has {} videos)",
                        index,
                        entries.len()
                    );
                }
                entry
            })
            .collect();
    }

    let start = options.playlist_start.max(1) - 1;
    let end = options
        .playlist_end
        .unwrap_or(entries.len())
        .min(entries.len());

    if start >= entries.len() {
        warn!(
            "Start index {} is beyond playlist length ({})",
            options.playlist_start,
            entries.len()
        );
        return Vec::new();
    }

    if start >= end {
        warn!(
            "Start index ({}) is >= end index ({})",
            options.playlist_start,
            options
                .playlist_end
                .map(|e| e.to_string())
                .unwrap_or_else(|| "end".to_string())
        );
        return Vec::new();
    }

    entries[start..end].to_vec()
}
