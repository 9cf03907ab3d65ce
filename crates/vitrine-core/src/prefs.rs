//! Persisted shopper preferences.
//!
//! Values are plain strings under fixed keys, stored either in memory or in a
//! JSON object file. [`Preferences`] layers typed accessors with defaults on
//! top of any [`PreferenceStore`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::locale::Country;

pub const THEME_KEY: &str = "theme";
pub const COUNTRY_KEY: &str = "country";
pub const NOTIFY_KEY: &str = "notify";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to write preferences to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value storage for preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences backed by a JSON object file, rewritten on every `set`.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Opens `path`. A missing or unreadable file starts empty; the file and
    /// its parent directories are created on the first write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) {
                Ok(map) => map
                    .into_iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                    .collect(),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "ignoring malformed preferences file"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not read preferences file"
                );
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Unknown values read as dark.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPreference {
    #[default]
    On,
    Off,
}

impl NotifyPreference {
    /// Only an explicit `off` disables notifications.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "off" {
            NotifyPreference::Off
        } else {
            NotifyPreference::On
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NotifyPreference::On => "on",
            NotifyPreference::Off => "off",
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        self == NotifyPreference::On
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            NotifyPreference::On => NotifyPreference::Off,
            NotifyPreference::Off => NotifyPreference::On,
        }
    }
}

/// Typed view over a [`PreferenceStore`].
pub struct Preferences {
    store: Box<dyn PreferenceStore>,
    default_country: Country,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("default_country", &self.default_country)
            .finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(store: impl PreferenceStore + 'static, default_country: Country) -> Self {
        Self {
            store: Box::new(store),
            default_country,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryPreferences::new(), Country::default())
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .map(|v| Theme::parse(&v))
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns [`PrefsError`] if the backing store cannot be written.
    pub fn set_theme(&self, theme: Theme) -> Result<(), PrefsError> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Stored country, or the configured default when missing or malformed.
    #[must_use]
    pub fn country(&self) -> Country {
        self.store
            .get(COUNTRY_KEY)
            .and_then(|v| Country::parse(&v))
            .unwrap_or_else(|| self.default_country.clone())
    }

    /// # Errors
    ///
    /// Returns [`PrefsError`] if the backing store cannot be written.
    pub fn set_country(&self, country: &Country) -> Result<(), PrefsError> {
        self.store.set(COUNTRY_KEY, country.as_str())
    }

    #[must_use]
    pub fn notify(&self) -> NotifyPreference {
        self.store
            .get(NOTIFY_KEY)
            .map(|v| NotifyPreference::parse(&v))
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns [`PrefsError`] if the backing store cannot be written.
    pub fn set_notify(&self, notify: NotifyPreference) -> Result<(), PrefsError> {
        self.store.set(NOTIFY_KEY, notify.as_str())
    }
}
