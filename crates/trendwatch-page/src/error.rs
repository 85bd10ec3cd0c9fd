use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("chromium binary not found; set TRENDWATCH_CHROMIUM_PATH or install Chrome")]
    BrowserNotFound,

    #[error("failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("required element not found after {timeout_secs}s: {role} ({locator})")]
    MissingElement {
        role: &'static str,
        locator: String,
        timeout_secs: u64,
    },

    #[error("browser command failed: {0}")]
    Driver(String),
}
