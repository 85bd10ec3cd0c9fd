//! Canonical record types shared across every collection source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters kept from a post's free text.
pub const MAX_POST_TEXT_CHARS: usize = 100;

/// Platform a trend observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    TrendsSite,
    ShortVideoSite,
    SearchTrendsApi,
    SocialSearchApi,
}

impl std::fmt::Display for TrendSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendSource::TrendsSite => write!(f, "trends-site"),
            TrendSource::ShortVideoSite => write!(f, "short-video-site"),
            TrendSource::SearchTrendsApi => write!(f, "search-trends-api"),
            TrendSource::SocialSearchApi => write!(f, "social-search-api"),
        }
    }
}

/// One observed label (hashtag, product name, or search term) and its
/// popularity count on one platform.
///
/// Construct through [`crate::normalize::normalize_trend`] so the label and
/// count invariants hold: label non-empty after whitespace normalization,
/// count with separators stripped and `k` suffixes expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub label: String,
    pub count: u64,
    pub source: TrendSource,
}

/// A collected post from the media API.
///
/// `text` is truncated at construction; the identifier is only unique within
/// one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub text: String,
    pub like_count: u64,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
}

impl PostRecord {
    /// Builds a record, truncating `text` to [`MAX_POST_TEXT_CHARS`]
    /// characters on a character boundary.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text: &str,
        like_count: u64,
        comment_count: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: truncate_chars(text, MAX_POST_TEXT_CHARS),
            like_count,
            comment_count,
            created_at,
        }
    }
}

/// Interest score for one product in one subnational region.
///
/// `score` is `None` when the regional-interest query returned no breakdown
/// for the state (distinct from a failed query, which produces no record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalInterestRecord {
    pub state: String,
    pub product: String,
    pub score: Option<u8>,
}

/// The 27 Brazilian federative-unit codes accepted as `state` values.
pub const BRAZIL_STATES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

/// Returns `true` if `code` is one of the 27 federative-unit codes.
/// Matching is case-sensitive; callers should uppercase user input first.
#[must_use]
pub fn is_valid_state(code: &str) -> bool {
    BRAZIL_STATES.contains(&code)
}

/// Truncates `s` to at most `max` characters, respecting char boundaries.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
