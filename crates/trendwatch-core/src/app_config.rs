use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

/// Runtime configuration, loaded from the environment by
/// [`crate::config::load_app_config`].
///
/// Credentials are optional here; each CLI command requires the ones it needs
/// through [`AppConfig::require_bearer_token`] /
/// [`AppConfig::require_media_credentials`] before any network activity.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub geo: String,
    pub categories_path: PathBuf,
    pub output_dir: PathBuf,

    pub bearer_token: Option<String>,
    pub media_username: Option<String>,
    pub media_password: Option<String>,

    pub search_api_url: String,
    pub interest_api_url: String,
    pub media_api_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,

    pub overlay_timeout_secs: u64,
    pub element_timeout_secs: u64,
    pub settle_wait_secs: u64,
    pub poll_interval_ms: u64,
    pub chromium_path: Option<PathBuf>,

    pub interest_delay_secs: u64,
    pub interest_jitter_secs: u64,
    pub sample_size: usize,
    pub max_attempts: u32,
}

impl AppConfig {
    /// Returns the bearer token or the fatal precondition error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `BEARER_TOKEN` was not set.
    pub fn require_bearer_token(&self) -> Result<&str, ConfigError> {
        self.bearer_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("BEARER_TOKEN".to_string()))
    }

    /// Returns the media-API credentials or the fatal precondition error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first missing one of
    /// `MEDIA_USERNAME` / `MEDIA_PASSWORD`.
    pub fn require_media_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let username = self
            .media_username
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("MEDIA_USERNAME".to_string()))?;
        let password = self
            .media_password
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("MEDIA_PASSWORD".to_string()))?;
        Ok((username, password))
    }

    #[must_use]
    pub fn overlay_timeout(&self) -> Duration {
        Duration::from_secs(self.overlay_timeout_secs)
    }

    #[must_use]
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    #[must_use]
    pub fn settle_wait(&self) -> Duration {
        Duration::from_secs(self.settle_wait_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("geo", &self.geo)
            .field("categories_path", &self.categories_path)
            .field("output_dir", &self.output_dir)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "media_username",
                &self.media_username.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "media_password",
                &self.media_password.as_ref().map(|_| "[redacted]"),
            )
            .field("search_api_url", &self.search_api_url)
            .field("interest_api_url", &self.interest_api_url)
            .field("media_api_url", &self.media_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("overlay_timeout_secs", &self.overlay_timeout_secs)
            .field("element_timeout_secs", &self.element_timeout_secs)
            .field("settle_wait_secs", &self.settle_wait_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("chromium_path", &self.chromium_path)
            .field("interest_delay_secs", &self.interest_delay_secs)
            .field("interest_jitter_secs", &self.interest_jitter_secs)
            .field("sample_size", &self.sample_size)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
