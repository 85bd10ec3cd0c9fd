//! Request and response shapes for the search API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trendwatch_core::TsvRecord;

use crate::error::SocialError;

/// A search predicate: mentions of one account, or a disjunction of
/// hashtags. Reposts are always excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Query matching mentions of `username` (leading `@` optional).
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::InvalidQuery`] for an empty username.
    pub fn mentions(username: &str) -> Result<Self, SocialError> {
        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return Err(SocialError::InvalidQuery(
                "username must be non-empty".to_string(),
            ));
        }
        Ok(Self(format!("@{username} -is:retweet")))
    }

    /// Query matching any of `hashtags` (leading `#` optional on each).
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::InvalidQuery`] when no non-empty hashtag
    /// remains.
    pub fn hashtags<S: AsRef<str>>(hashtags: &[S]) -> Result<Self, SocialError> {
        let tags: Vec<String> = hashtags
            .iter()
            .map(|t| t.as_ref().trim().trim_start_matches('#').to_owned())
            .filter(|t| !t.is_empty())
            .map(|t| format!("#{t}"))
            .collect();
        if tags.is_empty() {
            return Err(SocialError::InvalidQuery(
                "at least one non-empty hashtag is required".to_string(),
            ));
        }
        Ok(Self(format!("{} -is:retweet", tags.join(" OR "))))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One matching item from the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    pub text: String,
}

impl TsvRecord for SearchItem {
    fn header() -> &'static [&'static str] {
        &["created_at", "author_id", "text"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.created_at.to_rfc3339(),
            self.author_id.clone(),
            self.text.clone(),
        ]
    }
}

/// Envelope returned by the search endpoint. `data` is absent when nothing
/// matched.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<SearchItem>,
}
