//! HTTP client for the bearer-token search API.
//!
//! Wraps `reqwest` with typed error handling and the result-count clamp the
//! endpoint enforces. Absence of the credential is a process-level
//! precondition checked by the caller before this client is ever built; a
//! non-2xx response here is non-fatal and surfaces as a typed error.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SocialError;
use crate::types::{SearchItem, SearchQuery, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2/tweets";

/// Smallest result count the search endpoint accepts.
pub const MIN_SEARCH_RESULTS: u32 = 10;
/// Largest result count the search endpoint accepts.
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// Client for the recent-search endpoint.
///
/// Use [`SearchClient::new`] for production or
/// [`SearchClient::with_base_url`] to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    bearer_token: String,
    base_url: Url,
}

impl SearchClient {
    /// Creates a client pointed at the production search API.
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SocialError> {
        Self::with_base_url(bearer_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SocialError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SocialError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SocialError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so join() appends rather
        // than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SocialError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            bearer_token: bearer_token.to_owned(),
            base_url,
        })
    }

    /// Runs one recent-search request.
    ///
    /// `max_results` is clamped into
    /// [[`MIN_SEARCH_RESULTS`], [`MAX_SEARCH_RESULTS`]] before the request
    /// is issued. A response without a `data` field yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`SocialError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SocialError::Http`] on network failure.
    /// - [`SocialError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search(
        &self,
        query: &SearchQuery,
        max_results: u32,
    ) -> Result<Vec<SearchItem>, SocialError> {
        let max_results = max_results.clamp(MIN_SEARCH_RESULTS, MAX_SEARCH_RESULTS);

        let mut url = self
            .base_url
            .join("search/recent")
            .map_err(|e| SocialError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("query", query.as_str())
            .append_pair("fields", "created_at,author_id,text")
            .append_pair("max_results", &max_results.to_string());

        tracing::info!(query = query.as_str(), max_results, "searching recent posts");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.bearer_token)
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
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SocialError::Deserialize {
                context: format!("search(query={})", query.as_str()),
                source: e,
            })?;

        tracing::info!(items = parsed.data.len(), "search finished");
        Ok(parsed.data)
    }
}
