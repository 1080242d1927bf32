use crate::app_config::AppConfig;
use crate::ConfigError;

/// Desktop Chrome identifier; Google serves stripped-down or blocked pages
/// to default HTTP client user agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        Ok(value)
    };

    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    let log_level = or_default("GMAPS2VCARD_LOG_LEVEL", "warn");
    let places_base_url = or_default("GMAPS2VCARD_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let user_agent = or_default("GMAPS2VCARD_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("GMAPS2VCARD_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GMAPS2VCARD_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let navigation_timeout_ms = parse_u64("GMAPS2VCARD_NAVIGATION_TIMEOUT_MS", "30000")?;
    let settle_delay_ms = parse_u64("GMAPS2VCARD_SETTLE_DELAY_MS", "2000")?;

    Ok(AppConfig {
        log_level,
        places_api_key,
        places_base_url,
        request_timeout_secs,
        user_agent,
        navigation_timeout_ms,
        settle_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
