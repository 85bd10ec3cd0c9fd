//! HTTP client for the search-trends API.
//!
//! Three read-only endpoints: the daily trending list, an interest-over-time
//! series, and a regional-interest breakdown. All scores are on the
//! service's normalized 0–100 scale. The endpoint enforces a request quota;
//! pacing between calls is the pollers' responsibility
//! (see [`crate::pacing::PacingPolicy`]).

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::InterestError;

const DEFAULT_BASE_URL: &str = "https://trends.google.com/trends/api";

/// One sample of an interest-over-time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct InterestPoint {
    pub timestamp: i64,
    pub value: u8,
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    trends: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    points: Vec<InterestPoint>,
}

#[derive(Debug, Deserialize)]
struct RegionResponse {
    #[serde(default)]
    regions: BTreeMap<String, u8>,
}

/// Client for the search-trends API.
///
/// Use [`InterestClient::new`] for production or
/// [`InterestClient::with_base_url`] to point at a mock server in tests.
pub struct InterestClient {
    client: Client,
    base_url: Url,
}

impl InterestClient {
    /// Creates a client pointed at the production trends API.
    ///
    /// # Errors
    ///
    /// Returns [`InterestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, InterestError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`InterestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`InterestError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, InterestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| InterestError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches today's trending search terms for `geo` (e.g. `"BR"`).
    ///
    /// # Errors
    ///
    /// - [`InterestError::UnexpectedStatus`] on a non-2xx response.
    /// - [`InterestError::Http`] on network failure.
    /// - [`InterestError::Deserialize`] on an unexpected body shape.
    pub async fn trending_terms(&self, geo: &str) -> Result<Vec<String>, InterestError> {
        let body: TrendingResponse = self
            .get_json("trending", &[("geo", geo)], "trending")
            .await?;
        Ok(body.trends)
    }

    /// Fetches the interest-over-time series for one term.
    ///
    /// `window` uses the service's relative-range syntax (e.g. `"now 1-d"`,
    /// `"now 7-d"`). An unknown term yields an empty series, not an error.
    ///
    /// # Errors
    ///
    /// Same as [`InterestClient::trending_terms`].
    pub async fn interest_over_time(
        &self,
        term: &str,
        geo: &str,
        window: &str,
    ) -> Result<Vec<InterestPoint>, InterestError> {
        let body: TimelineResponse = self
            .get_json(
                "interest/timeline",
                &[("term", term), ("geo", geo), ("window", window)],
                &format!("interest_over_time(term={term})"),
            )
            .await?;
        Ok(body.points)
    }

    /// Fetches the per-region interest index for one term.
    ///
    /// `geo` narrows the breakdown (e.g. `"BR-SP"`); the returned map is
    /// keyed by region code and may omit regions without data.
    ///
    /// # Errors
    ///
    /// Same as [`InterestClient::trending_terms`].
    pub async fn interest_by_region(
        &self,
        term: &str,
        geo: &str,
        window: &str,
    ) -> Result<BTreeMap<String, u8>, InterestError> {
        let body: RegionResponse = self
            .get_json(
                "interest/region",
                &[
                    ("term", term),
                    ("geo", geo),
                    ("window", window),
                    ("resolution", "REGION"),
                ],
                &format!("interest_by_region(term={term})"),
            )
            .await?;
        Ok(body.regions)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        context: &str,
    ) -> Result<T, InterestError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| InterestError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InterestError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| InterestError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_exactly_one_trailing_slash() {
        let client = InterestClient::with_base_url(30, "ua", "https://example.com/api///").unwrap();
        assert_eq!(client.base_url.as_str(), "https://example.com/api/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = InterestClient::with_base_url(30, "ua", "::not-a-url::");
        assert!(matches!(result, Err(InterestError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn timeline_response_defaults_to_empty_points() {
        let parsed: TimelineResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.points.is_empty());
    }
}
