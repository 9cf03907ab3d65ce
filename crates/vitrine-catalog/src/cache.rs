use std::sync::Arc;

use tokio::sync::RwLock;
use vitrine_core::Product;

use crate::error::CatalogError;
use crate::source::ProductSource;

/// In-memory catalog snapshot shared by rendering and the API.
///
/// Readers get an `Arc` to an immutable snapshot. [`CatalogCache::load`]
/// swaps the snapshot only when the fetch succeeds.
pub struct CatalogCache {
    source: Arc<dyn ProductSource>,
    products: RwLock<Option<Arc<Vec<Product>>>>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self {
            source,
            products: RwLock::new(None),
        }
    }

    /// Fetches once from the source and replaces the snapshot.
    ///
    /// Returns the number of products loaded.
    ///
    /// # Errors
    ///
    /// Returns the source error; the previous snapshot is kept.
    pub async fn load(&self) -> Result<usize, CatalogError> {
        match self.source.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                *self.products.write().await = Some(Arc::new(products));
                tracing::info!(count, "catalog cache loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog load failed; keeping previous cache");
                Err(e)
            }
        }
    }

    /// Current snapshot; empty until the first successful load.
    pub async fn products(&self) -> Arc<Vec<Product>> {
        self.products.read().await.clone().unwrap_or_default()
    }

    pub async fn is_loaded(&self) -> bool {
        self.products.read().await.is_some()
    }
}
