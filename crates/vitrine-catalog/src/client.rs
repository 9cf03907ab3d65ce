use std::path::PathBuf;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use vitrine_core::Product;

use crate::error::CatalogError;
use crate::normalize::normalize_catalog;
use crate::source::ProductSource;

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Url(String),
    File(PathBuf),
}

impl CatalogLocation {
    /// `http://` and `https://` sources are fetched; anything else is a file path.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogLocation::Url(trimmed.to_string())
        } else {
            CatalogLocation::File(PathBuf::from(trimmed))
        }
    }
}

/// Loads and normalizes the product catalog from a URL or a local file.
pub struct CatalogClient {
    client: Client,
    location: CatalogLocation,
}

impl CatalogClient {
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(source: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            location: CatalogLocation::parse(source),
        })
    }

    /// Fetches the raw catalog document once.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] for HTTP 404.
    /// - [`CatalogError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`CatalogError::Http`] on network or TLS failure.
    /// - [`CatalogError::Io`] if the catalog file cannot be read.
    /// - [`CatalogError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_document(&self) -> Result<Value, CatalogError> {
        let (body, context) = match &self.location {
            CatalogLocation::Url(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound { url: url.clone() });
                }
                if !status.is_success() {
                    return Err(CatalogError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.clone(),
                    });
                }
                (response.text().await?, format!("catalog from {url}"))
            }
            CatalogLocation::File(path) => {
                let body = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?;
                (body, format!("catalog file {}", path.display()))
            }
        };

        serde_json::from_str(&body).map_err(|source| CatalogError::Deserialize { context, source })
    }

    /// Fetches and normalizes the catalog.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_document`].
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let doc = self.fetch_document().await?;
        let products = normalize_catalog(&doc);
        tracing::debug!(count = products.len(), location = ?self.location, "catalog fetched");
        Ok(products)
    }
}

impl ProductSource for CatalogClient {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Vec<Product>, CatalogError>> {
        Box::pin(CatalogClient::fetch_products(self))
    }
}
