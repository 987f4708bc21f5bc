//! Remote catalog seam.

use async_trait::async_trait;

use novashop_core::{ApiError, ProductId};

use crate::product::{Category, Product};

/// Read access to the marketplace catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
}
