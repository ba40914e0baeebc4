//! Loading the profile list a run works through.
//!
//! The input is the JSON dump of a hashtag search: one entry per post, each
//! carrying its author and the author's stats. Authors are deduplicated and
//! filtered by follower count before a run starts.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::profile::ProfileRecord;

static FOLLOWER_BOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*([kKmM]?)\s*$").expect("valid regex"));

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid follower bound \"{raw}\": {reason}")]
    InvalidFollowerBound { raw: String, reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashtagAuthor {
    unique_id: String,
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashtagAuthorStats {
    #[serde(default)]
    follower_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashtagPost {
    author: HashtagAuthor,
    author_stats: HashtagAuthorStats,
}

/// Inclusive follower-count window. `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl Default for FollowerRange {
    fn default() -> Self {
        Self { min: 0, max: None }
    }
}

impl FollowerRange {
    /// Builds a range from CLI-style bounds such as `"10k"` and `"INF"`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidFollowerBound`] if either bound does not
    /// parse, or if the minimum is unbounded.
    pub fn parse(min: &str, max: &str) -> Result<Self, InputError> {
        let min = parse_follower_bound(min)?.ok_or_else(|| InputError::InvalidFollowerBound {
            raw: min.to_owned(),
            reason: "minimum cannot be unbounded".to_owned(),
        })?;
        let max = parse_follower_bound(max)?;
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn contains(&self, follower_count: u64) -> bool {
        follower_count >= self.min && self.max.is_none_or(|max| follower_count <= max)
    }
}

/// Parses a follower bound: plain digits, a `k`/`m` suffix (thousand/million,
/// case-insensitive), or `INF` for no bound.
///
/// # Errors
///
/// Returns [`InputError::InvalidFollowerBound`] for anything else, including
/// values that overflow `u64`.
pub fn parse_follower_bound(raw: &str) -> Result<Option<u64>, InputError> {
    if raw.trim().eq_ignore_ascii_case("inf") {
        return Ok(None);
    }
    let invalid = |reason: &str| InputError::InvalidFollowerBound {
        raw: raw.to_owned(),
        reason: reason.to_owned(),
    };
    let caps = FOLLOWER_BOUND_RE
        .captures(raw)
        .ok_or_else(|| invalid("expected digits with optional k/M suffix, or INF"))?;
    let base: u64 = caps[1].parse().map_err(|_| invalid("number too large"))?;
    let scale = match caps[2].to_ascii_lowercase().as_str() {
        "k" => 1_000,
        "m" => 1_000_000,
        _ => 1,
    };
    base.checked_mul(scale)
        .map(Some)
        .ok_or_else(|| invalid("number too large"))
}

/// Reads a hashtag-results file and returns the unique authors inside `range`.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the file cannot be read and
/// [`InputError::Deserialize`] if it is not a JSON array of posts.
pub fn load_profiles(path: &Path, range: FollowerRange) -> Result<Vec<ProfileRecord>, InputError> {
    let raw = std::fs::read_to_string(path).map_err(|e| InputError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_profiles(&raw, &path.display().to_string(), range)
}

/// Parses hashtag results already in memory. The first post seen for an
/// author wins; later posts by the same author are ignored.
pub(crate) fn parse_profiles(
    raw: &str,
    context: &str,
    range: FollowerRange,
) -> Result<Vec<ProfileRecord>, InputError> {
    let posts: Vec<HashtagPost> =
        serde_json::from_str(raw).map_err(|e| InputError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;

    let mut seen = HashSet::new();
    let profiles = posts
        .into_iter()
        .filter(|post| range.contains(post.author_stats.follower_count))
        .filter(|post| seen.insert(post.author.unique_id.clone()))
        .map(|post| {
            let mut record =
                ProfileRecord::new(post.author.unique_id, post.author_stats.follower_count);
            record.name = post.author.nickname;
            record.signature = post.author.signature;
            record
        })
        .collect();
    Ok(profiles)
}

/// Trims `profiles` to `[from, to)` and then to at most `limit` entries.
///
/// A negative or out-of-range `from`/`to` means "the end of the list", so
/// `to = -1` selects everything from `from` onward. An inverted range is empty.
#[must_use]
pub fn select_range<T>(profiles: Vec<T>, from: i64, to: i64, limit: usize) -> Vec<T> {
    let len = profiles.len();
    let clamp = |idx: i64| -> usize {
        usize::try_from(idx)
            .ok()
            .filter(|&i| i < len)
            .unwrap_or(len)
    };
    let start = clamp(from);
    let end = clamp(to);
    if start >= end {
        return Vec::new();
    }
    profiles
        .into_iter()
        .skip(start)
        .take((end - start).min(limit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, followers: u64) -> serde_json::Value {
        serde_json::json!({
            "author": {
                "uniqueId": id,
                "nickname": format!("{id} nick"),
                "signature": "contact: hello@example.com",
                "id": "1",
                "avatarMedium": ""
            },
            "authorStats": {
                "followerCount": followers,
                "diggCount": 0,
                "heartCount": 0,
                "videoCount": 3
            },
            "createdTime": 1_700_000_000,
            "desc": "#faceyoga"
        })
    }

    #[test]
    fn parse_follower_bound_plain_number() {
        assert_eq!(parse_follower_bound("500").unwrap(), Some(500));
    }

    #[test]
    fn parse_follower_bound_suffixes() {
        assert_eq!(parse_follower_bound("10k").unwrap(), Some(10_000));
        assert_eq!(parse_follower_bound("10K").unwrap(), Some(10_000));
        assert_eq!(parse_follower_bound("2M").unwrap(), Some(2_000_000));
    }

    #[test]
    fn parse_follower_bound_inf_is_unbounded() {
        assert_eq!(parse_follower_bound("INF").unwrap(), None);
        assert_eq!(parse_follower_bound("inf").unwrap(), None);
    }

    #[test]
    fn parse_follower_bound_rejects_garbage() {
        assert!(matches!(
            parse_follower_bound("ten"),
            Err(InputError::InvalidFollowerBound { .. })
        ));
        assert!(parse_follower_bound("5g").is_err());
    }

    #[test]
    fn follower_range_rejects_unbounded_minimum() {
        assert!(FollowerRange::parse("INF", "INF").is_err());
    }

    #[test]
    fn follower_range_contains_is_inclusive() {
        let range = FollowerRange::parse("1k", "2k").unwrap();
        assert!(!range.contains(999));
        assert!(range.contains(1_000));
        assert!(range.contains(2_000));
        assert!(!range.contains(2_001));
    }

    #[test]
    fn parse_profiles_dedups_and_filters() {
        let raw = serde_json::json!([
            post("alice", 5_000),
            post("bob", 50),
            post("alice", 5_000),
            post("carol", 20_000),
        ])
        .to_string();
        let range = FollowerRange::parse("1k", "INF").unwrap();
        let profiles = parse_profiles(&raw, "test", range).unwrap();
        let ids: Vec<&str> = profiles.iter().map(|p| p.unique_id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "carol"]);
        assert_eq!(profiles[0].name, "alice nick");
        assert_eq!(profiles[0].follower_count, 5_000);
    }

    #[test]
    fn parse_profiles_rejects_non_array() {
        let result = parse_profiles("{\"not\": \"an array\"}", "test", FollowerRange::default());
        assert!(matches!(result, Err(InputError::Deserialize { .. })));
    }

    #[test]
    fn load_profiles_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, serde_json::json!([post("dana", 10)]).to_string()).unwrap();
        let profiles = load_profiles(&path, FollowerRange::default()).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].unique_id, "dana");
    }

    #[test]
    fn load_profiles_missing_file_is_read_error() {
        let result = load_profiles(Path::new("/nonexistent/posts.json"), FollowerRange::default());
        assert!(matches!(result, Err(InputError::Read { .. })));
    }

    #[test]
    fn select_range_defaults_select_everything() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(select_range(items, 0, -1, usize::MAX), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn select_range_applies_bounds_then_limit() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(select_range(items.clone(), 2, 8, 3), vec![2, 3, 4]);
        assert_eq!(select_range(items, 7, 100, 10), vec![7, 8, 9]);
    }

    #[test]
    fn select_range_negative_from_is_empty() {
        let items: Vec<u32> = (0..4).collect();
        assert!(select_range(items, -1, -1, 10).is_empty());
    }

    #[test]
    fn select_range_inverted_is_empty() {
        let items: Vec<u32> = (0..10).collect();
        assert!(select_range(items, 6, 3, 10).is_empty());
    }
}
