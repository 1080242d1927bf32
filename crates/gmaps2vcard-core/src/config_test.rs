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
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.log_level, "warn");
    assert!(cfg.places_api_key.is_none());
    assert_eq!(cfg.places_base_url, DEFAULT_PLACES_BASE_URL);
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.navigation_timeout_ms, 30_000);
    assert_eq!(cfg.settle_delay_ms, 2_000);
}

#[test]
fn api_key_is_read_and_trimmed() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "  abc123 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.places_api_key.as_deref(), Some("abc123"));
}

#[test]
fn blank_api_key_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.places_api_key.is_none());
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("GMAPS2VCARD_REQUEST_TIMEOUT_SECS", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 25);
}

#[test]
fn non_numeric_request_timeout_fails() {
    let mut map = HashMap::new();
    map.insert("GMAPS2VCARD_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GMAPS2VCARD_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GMAPS2VCARD_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn zero_request_timeout_fails() {
    let mut map = HashMap::new();
    map.insert("GMAPS2VCARD_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn invalid_settle_delay_fails() {
    let mut map = HashMap::new();
    map.insert("GMAPS2VCARD_SETTLE_DELAY_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GMAPS2VCARD_SETTLE_DELAY_MS"),
        "got: {result:?}"
    );
}

#[test]
fn browser_timings_override() {
    let mut map = HashMap::new();
    map.insert("GMAPS2VCARD_NAVIGATION_TIMEOUT_MS", "45000");
    map.insert("GMAPS2VCARD_SETTLE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.navigation_timeout_ms, 45_000);
    assert_eq!(cfg.settle_delay_ms, 0);
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"), "{debug}");
    assert!(debug.contains("[redacted]"), "{debug}");
}
