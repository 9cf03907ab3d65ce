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
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "VITRINE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.catalog_source, "assets/products.json");
    assert_eq!(cfg.assets_dir.to_string_lossy(), "./assets");
    assert_eq!(cfg.prefs_path.to_string_lossy(), "./.vitrine/prefs.json");
    assert_eq!(cfg.checkout_path, "checkout.html");
    assert_eq!(cfg.default_country.as_str(), "BR");
    assert_eq!(cfg.offer_interval_secs, 25);
    assert_eq!(cfg.toast_ttl_secs, 6);
    assert_eq!(cfg.http_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "vitrine/0.1 (storefront)");
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("VITRINE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_BIND_ADDR"),
        "expected InvalidEnvVar(VITRINE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_empty_catalog_source() {
    let mut map = HashMap::new();
    map.insert("VITRINE_CATALOG_SOURCE", "  ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_CATALOG_SOURCE"),
        "expected InvalidEnvVar(VITRINE_CATALOG_SOURCE), got: {result:?}"
    );
}

#[test]
fn default_country_override_is_normalized() {
    let mut map = HashMap::new();
    map.insert("VITRINE_DEFAULT_COUNTRY", "us");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_country.as_str(), "US");
}

#[test]
fn default_country_rejects_garbage() {
    let mut map = HashMap::new();
    map.insert("VITRINE_DEFAULT_COUNTRY", "B R!");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_DEFAULT_COUNTRY"),
        "expected InvalidEnvVar(VITRINE_DEFAULT_COUNTRY), got: {result:?}"
    );
}

#[test]
fn offer_interval_override() {
    let mut map = HashMap::new();
    map.insert("VITRINE_OFFER_INTERVAL_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.offer_interval_secs, 60);
    assert_eq!(cfg.offer_interval().as_secs(), 60);
}

#[test]
fn offer_interval_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("VITRINE_OFFER_INTERVAL_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_OFFER_INTERVAL_SECS"),
        "expected InvalidEnvVar(VITRINE_OFFER_INTERVAL_SECS), got: {result:?}"
    );
}

#[test]
fn toast_ttl_invalid() {
    let mut map = HashMap::new();
    map.insert("VITRINE_TOAST_TTL_SECS", "six");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_TOAST_TTL_SECS"),
        "expected InvalidEnvVar(VITRINE_TOAST_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("VITRINE_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}
