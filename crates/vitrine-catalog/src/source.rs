use futures::future::{self, BoxFuture};
use vitrine_core::Product;

use crate::error::CatalogError;

/// Anything that can produce a fresh copy of the product catalog.
pub trait ProductSource: Send + Sync {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Vec<Product>, CatalogError>>;
}

/// A fixed, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticProducts(pub Vec<Product>);

impl ProductSource for StaticProducts {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Vec<Product>, CatalogError>> {
        Box::pin(future::ready(Ok(self.0.clone())))
    }
}
