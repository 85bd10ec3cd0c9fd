use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed. Credentials stay optional at this layer;
/// commands that need them check through `AppConfig::require_*` before any
/// network activity.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("TRENDWATCH_LOG_LEVEL", "info");
    let geo = or_default("TRENDWATCH_GEO", "BR");
    let categories_path = PathBuf::from(or_default(
        "TRENDWATCH_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));
    let output_dir = PathBuf::from(or_default("TRENDWATCH_OUTPUT_DIR", "."));

    let bearer_token = lookup("BEARER_TOKEN").ok();
    let media_username = lookup("MEDIA_USERNAME").ok();
    let media_password = lookup("MEDIA_PASSWORD").ok();

    let search_api_url = or_default(
        "TRENDWATCH_SEARCH_API_URL",
        "https://api.twitter.com/2/tweets",
    );
    let interest_api_url = or_default(
        "TRENDWATCH_INTEREST_API_URL",
        "https://trends.google.com/trends/api",
    );
    let media_api_url = or_default("TRENDWATCH_MEDIA_API_URL", "https://i.instagram.com/api/v1");
    let request_timeout_secs = parse_u64("TRENDWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TRENDWATCH_USER_AGENT", "trendwatch/0.1 (trend-collection)");

    let overlay_timeout_secs = parse_u64("TRENDWATCH_OVERLAY_TIMEOUT_SECS", "5")?;
    let element_timeout_secs = parse_u64("TRENDWATCH_ELEMENT_TIMEOUT_SECS", "10")?;
    let settle_wait_secs = parse_u64("TRENDWATCH_SETTLE_WAIT_SECS", "10")?;
    let poll_interval_ms = parse_u64("TRENDWATCH_POLL_INTERVAL_MS", "250")?;
    let chromium_path = lookup("TRENDWATCH_CHROMIUM_PATH").ok().map(PathBuf::from);

    let interest_delay_secs = parse_u64("TRENDWATCH_INTEREST_DELAY_SECS", "60")?;
    let interest_jitter_secs = parse_u64("TRENDWATCH_INTEREST_JITTER_SECS", "15")?;
    let sample_size = parse_usize("TRENDWATCH_SAMPLE_SIZE", "4")?;
    let max_attempts = parse_u32("TRENDWATCH_MAX_ATTEMPTS", "1")?;

    Ok(AppConfig {
        log_level,
        geo,
        categories_path,
        output_dir,
        bearer_token,
        media_username,
        media_password,
        search_api_url,
        interest_api_url,
        media_api_url,
        request_timeout_secs,
        user_agent,
        overlay_timeout_secs,
        element_timeout_secs,
        settle_wait_secs,
        poll_interval_ms,
        chromium_path,
        interest_delay_secs,
        interest_jitter_secs,
        sample_size,
        max_attempts,
    })
}
