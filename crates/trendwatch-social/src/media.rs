//! Credentialed client for the media API (per-account and per-tag posts).
//!
//! Authentication itself is the platform's concern; this client only
//! forwards the account credentials on each request. Raw posts are
//! normalized into [`PostRecord`] here, with malformed items skipped and
//! logged rather than failing the batch.

use std::time::Duration;

use chrono::DateTime;
use reqwest::{Client, Url};
use serde::Deserialize;
use trendwatch_core::PostRecord;

use crate::error::SocialError;

const DEFAULT_BASE_URL: &str = "https://i.instagram.com/api/v1";

/// Largest number of posts fetched per target.
pub const MAX_MEDIA_COUNT: usize = 50;

/// Account credentials for the media API. Loaded from the environment and
/// checked as a startup precondition before any collection begins.
#[derive(Clone)]
pub struct MediaCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for MediaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCredentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// One raw post as returned by the media API.
#[derive(Debug, Deserialize)]
struct MediaPost {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
    create_time: i64,
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    #[serde(default)]
    items: Vec<MediaPost>,
}

/// Client for the media API.
pub struct MediaClient {
    client: Client,
    credentials: MediaCredentials,
    base_url: Url,
}

impl MediaClient {
    /// Creates a client pointed at the production media API.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: MediaCredentials,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SocialError> {
        Self::with_base_url(credentials, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SocialError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        credentials: MediaCredentials,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SocialError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SocialError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    /// Fetches the most recent posts of one account.
    ///
    /// `count` is bounded to [`MAX_MEDIA_COUNT`].
    ///
    /// # Errors
    ///
    /// - [`SocialError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SocialError::Http`] on network failure.
    /// - [`SocialError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn user_posts(
        &self,
        username: &str,
        count: usize,
    ) -> Result<Vec<PostRecord>, SocialError> {
        tracing::info!(username, count, "fetching account posts");
        self.fetch_posts(&format!("users/{username}/media"), count)
            .await
    }

    /// Fetches the most recent posts carrying one tag.
    ///
    /// `count` is bounded to [`MAX_MEDIA_COUNT`].
    ///
    /// # Errors
    ///
    /// Same as [`MediaClient::user_posts`].
    pub async fn tag_posts(&self, tag: &str, count: usize) -> Result<Vec<PostRecord>, SocialError> {
        let tag = tag.trim_start_matches('#');
        tracing::info!(tag, count, "fetching tag posts");
        self.fetch_posts(&format!("tags/{tag}/media/recent"), count)
            .await
    }

    async fn fetch_posts(&self, path: &str, count: usize) -> Result<Vec<PostRecord>, SocialError> {
        let count = count.clamp(1, MAX_MEDIA_COUNT);

        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SocialError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string());

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SocialError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: MediaResponse =
            serde_json::from_str(&body).map_err(|e| SocialError::Deserialize {
                context: format!("media posts from {path}"),
                source: e,
            })?;

        let posts: Vec<PostRecord> = parsed
            .items
            .into_iter()
            .filter_map(|item| match DateTime::from_timestamp(item.create_time, 0) {
                Some(created_at) => Some(PostRecord::new(
                    item.id,
                    &item.text,
                    item.like_count,
                    item.comment_count,
                    created_at,
                )),
                None => {
                    tracing::warn!(id = %item.id, create_time = item.create_time, "skipping post with invalid timestamp");
                    None
                }
            })
            .collect();

        tracing::info!(posts = posts.len(), "media fetch finished");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = MediaCredentials {
            username: "collector".into(),
            password: "s3cret".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("collector"));
    }

    #[test]
    fn media_response_defaults_to_empty_items() {
        let parsed: MediaResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn media_post_optional_counters_default_to_zero() {
        let parsed: MediaPost =
            serde_json::from_str(r#"{"id":"9","create_time":1732100000}"#).unwrap();
        assert_eq!(parsed.like_count, 0);
        assert_eq!(parsed.comment_count, 0);
        assert_eq!(parsed.text, "");
    }
}
