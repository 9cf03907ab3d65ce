use crate::app_config::{AppConfig, Environment};
use crate::locale::Country;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// development configuration.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("VITRINE_ENV", "development"))?;

    let bind_addr = or_default("VITRINE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("VITRINE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("VITRINE_LOG_LEVEL", "info");

    let catalog_source = or_default("VITRINE_CATALOG_SOURCE", "assets/products.json");
    if catalog_source.trim().is_empty() {
        return Err(invalid("VITRINE_CATALOG_SOURCE", "must be non-empty".into()));
    }
    let assets_dir = PathBuf::from(or_default("VITRINE_ASSETS_DIR", "./assets"));
    let prefs_path = PathBuf::from(or_default("VITRINE_PREFS_PATH", "./.vitrine/prefs.json"));
    let checkout_path = or_default("VITRINE_CHECKOUT_PATH", "checkout.html");

    let default_country = Country::parse(&or_default("VITRINE_DEFAULT_COUNTRY", "BR"))
        .ok_or_else(|| invalid("VITRINE_DEFAULT_COUNTRY", "expected a country code".into()))?;

    let offer_interval_secs = parse_u64("VITRINE_OFFER_INTERVAL_SECS", "25")?;
    if offer_interval_secs == 0 {
        return Err(invalid(
            "VITRINE_OFFER_INTERVAL_SECS",
            "interval must be at least 1 second".into(),
        ));
    }
    let toast_ttl_secs = parse_u64("VITRINE_TOAST_TTL_SECS", "6")?;
    let http_timeout_secs = parse_u64("VITRINE_HTTP_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("VITRINE_USER_AGENT", "vitrine/0.1 (storefront)");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_source,
        assets_dir,
        prefs_path,
        checkout_path,
        default_country,
        offer_interval_secs,
        toast_ttl_secs,
        http_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VITRINE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
