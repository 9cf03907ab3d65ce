pub mod cache;
pub mod client;
pub mod error;
pub mod normalize;
pub mod source;

pub use cache::CatalogCache;
pub use client::{CatalogClient, CatalogLocation};
pub use error::CatalogError;
pub use normalize::{normalize_catalog, normalize_product};
pub use source::{ProductSource, StaticProducts};
