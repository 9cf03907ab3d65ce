use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::locale::Country;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// HTTP(S) URL or filesystem path of the JSON product catalog.
    pub catalog_source: String,
    /// Directory served under `/assets`; relative image paths resolve against it.
    pub assets_dir: PathBuf,
    /// JSON file backing the persisted preferences.
    pub prefs_path: PathBuf,
    /// Path used when a product has no explicit checkout URL for a country.
    pub checkout_path: String,
    pub default_country: Country,
    pub offer_interval_secs: u64,
    pub toast_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    #[must_use]
    pub fn offer_interval(&self) -> Duration {
        Duration::from_secs(self.offer_interval_secs)
    }

    #[must_use]
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs)
    }
}
