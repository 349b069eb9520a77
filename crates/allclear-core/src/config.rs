use crate::app_config::{AppConfig, Environment};
use crate::facility::GeoPosition;
use crate::ConfigError;

const DEV_API_BASE_URL: &str = "https://api-dev.allclear.app";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(invalid(var, format!("expected a boolean, got '{raw}'"))),
        }
    };

    let env = parse_environment(&or_default("ALLCLEAR_ENV", "development"));

    // Production must name its backend explicitly rather than fall through
    // to the development API.
    let api_base_url = match (&env, lookup("ALLCLEAR_API_BASE_URL")) {
        (_, Ok(url)) => url,
        (Environment::Production, Err(_)) => {
            return Err(ConfigError::MissingEnvVar(
                "ALLCLEAR_API_BASE_URL".to_string(),
            ))
        }
        (_, Err(_)) => DEV_API_BASE_URL.to_string(),
    };

    let log_level = or_default("ALLCLEAR_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("ALLCLEAR_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ALLCLEAR_USER_AGENT", "allclear/0.1 (facility-locator)");
    let max_retries = parse_u32("ALLCLEAR_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("ALLCLEAR_RETRY_BACKOFF_BASE_MS", "1000")?;
    let map_idle_debounce_ms = parse_u64("ALLCLEAR_MAP_IDLE_DEBOUNCE_MS", "300")?;
    let cancel_superseded = parse_bool("ALLCLEAR_CANCEL_SUPERSEDED", "true")?;

    let raw_center = or_default("ALLCLEAR_DEFAULT_CENTER", "40.71427,-74.00597");
    let default_center = GeoPosition::parse_pair(&raw_center).ok_or_else(|| {
        invalid(
            "ALLCLEAR_DEFAULT_CENTER",
            format!("expected 'lat,lng' within WGS84 bounds, got '{raw_center}'"),
        )
    })?;

    let default_zoom = or_default("ALLCLEAR_DEFAULT_ZOOM", "12")
        .parse::<u8>()
        .map_err(|e| invalid("ALLCLEAR_DEFAULT_ZOOM", e.to_string()))?;

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        map_idle_debounce_ms,
        cancel_superseded,
        default_center,
        default_zoom,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
