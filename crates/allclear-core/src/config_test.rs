use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "https://api-dev.allclear.app");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "allclear/0.1 (facility-locator)");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
    assert_eq!(cfg.map_idle_debounce_ms, 300);
    assert!(cfg.cancel_superseded);
    assert_eq!(cfg.default_center, GeoPosition::new(40.714_27, -74.005_97));
    assert_eq!(cfg.default_zoom, 12);
}

#[test]
fn build_app_config_production_requires_base_url() {
    let mut map = HashMap::new();
    map.insert("ALLCLEAR_ENV", "production");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ALLCLEAR_API_BASE_URL"),
        "expected MissingEnvVar(ALLCLEAR_API_BASE_URL), got: {result:?}"
    );

    map.insert("ALLCLEAR_API_BASE_URL", "https://api.allclear.app");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.api_base_url, "https://api.allclear.app");
}

#[test]
fn build_app_config_overrides() {
    let mut map = HashMap::new();
    map.insert("ALLCLEAR_MAX_RETRIES", "2");
    map.insert("ALLCLEAR_MAP_IDLE_DEBOUNCE_MS", "0");
    map.insert("ALLCLEAR_CANCEL_SUPERSEDED", "off");
    map.insert("ALLCLEAR_DEFAULT_CENTER", "47.81579, -122.307017");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.map_idle_debounce_ms, 0);
    assert!(!cfg.cancel_superseded);
    assert_eq!(cfg.default_center, GeoPosition::new(47.815_79, -122.307_017));
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("ALLCLEAR_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALLCLEAR_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ALLCLEAR_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_bool() {
    let mut map = HashMap::new();
    map.insert("ALLCLEAR_CANCEL_SUPERSEDED", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALLCLEAR_CANCEL_SUPERSEDED"),
        "expected InvalidEnvVar(ALLCLEAR_CANCEL_SUPERSEDED), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_out_of_range_center() {
    let mut map = HashMap::new();
    map.insert("ALLCLEAR_DEFAULT_CENTER", "120,10");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALLCLEAR_DEFAULT_CENTER"),
        "expected InvalidEnvVar(ALLCLEAR_DEFAULT_CENTER), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_oversized_zoom() {
    let mut map = HashMap::new();
    map.insert("ALLCLEAR_DEFAULT_ZOOM", "300");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ALLCLEAR_DEFAULT_ZOOM"
    ));
}
