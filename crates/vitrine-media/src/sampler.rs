use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::Client;

use crate::color::{dominant_color_from_bytes, Rgb};
use crate::error::MediaError;

/// Computes and memoizes accent colors for product images.
///
/// Only successful samples are cached, so a failed image is retried the next
/// time it is requested.
pub struct ColorSampler {
    client: Client,
    assets_dir: PathBuf,
    colors: RwLock<HashMap<String, Rgb>>,
    pending: RwLock<HashSet<String>>,
}

impl ColorSampler {
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        assets_dir: impl Into<PathBuf>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            assets_dir: assets_dir.into(),
            colors: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashSet::new()),
        })
    }

    /// Previously computed color for `image`, if any.
    #[must_use]
    pub fn cached(&self, image: &str) -> Option<Rgb> {
        self.colors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(image)
            .copied()
    }

    /// Copy of every cached color keyed by image reference.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Rgb> {
        self.colors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dominant color of `image`, served from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] if the image cannot be loaded or decoded.
    pub async fn sample(&self, image: &str) -> Result<Rgb, MediaError> {
        if let Some(color) = self.cached(image) {
            return Ok(color);
        }

        let bytes = self.load(image).await?;
        let color = tokio::task::spawn_blocking(move || dominant_color_from_bytes(&bytes)).await??;

        self.colors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(image.to_string(), color);
        tracing::debug!(image, color = %color, "sampled dominant color");
        Ok(color)
    }

    /// Starts background sampling for every uncached image.
    ///
    /// Failures are logged at debug level and otherwise ignored.
    pub fn warm<I, S>(self: &Arc<Self>, images: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for image in images {
            let image = image.into();
            if image.is_empty() || self.cached(&image).is_some() {
                continue;
            }
            let newly_pending = self
                .pending
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(image.clone());
            if !newly_pending {
                continue;
            }

            let sampler = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = sampler.sample(&image).await {
                    tracing::debug!(
                        image = %image,
                        error = %e,
                        "color sampling failed; using default styling"
                    );
                }
                sampler
                    .pending
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&image);
            });
        }
    }

    async fn load(&self, image: &str) -> Result<Vec<u8>, MediaError> {
        if image.starts_with("http://") || image.starts_with("https://") {
            let response = self.client.get(image).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(MediaError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: image.to_string(),
                });
            }
            return Ok(response.bytes().await?.to_vec());
        }

        let path = self.resolve_asset(image);
        tokio::fs::read(&path)
            .await
            .map_err(|source| MediaError::Io { path, source })
    }

    /// Maps a page-relative asset reference such as `assets/img/a.png` into
    /// the configured assets directory. Parent-directory components are dropped.
    fn resolve_asset(&self, image: &str) -> PathBuf {
        let relative = image.trim_start_matches('/');
        let relative = relative.strip_prefix("assets/").unwrap_or(relative);
        Path::new(relative)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .fold(self.assets_dir.clone(), |acc, part| acc.join(part))
    }
}
