pub mod app_config;
pub mod checkout;
pub mod config;
pub mod filter;
pub mod locale;
pub mod messages;
pub mod prefs;
pub mod price;
pub mod products;

pub use app_config::{AppConfig, Environment};
pub use checkout::{checkout_destination, checkout_slug, find_by_slug, slugify};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{apply_filters, ActiveTags, ShopperState};
pub use locale::{
    resolve_list, resolve_text, Country, Language, ListField, Localized, LocalizedList,
    LocalizedText, TextField,
};
pub use prefs::{
    FilePreferences, MemoryPreferences, NotifyPreference, PreferenceStore, Preferences,
    PrefsError, Theme,
};
pub use price::{parse_price, price_sort_key};
pub use products::Product;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
