//! Read-only catalog listing.

use serde::{Deserialize, Serialize};

use storefront_core::{Money, ProductId};

use crate::error::InventoryError;
use crate::product::Product;
use crate::store::ProductStore;

/// Browsing view of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id_typed().clone(),
            product_name: product.name().to_string(),
            price: product.price(),
        }
    }
}

/// Lists products that still have at least one free item.
///
/// Takes no locks: the result is a snapshot and may already be stale when the
/// caller reads it. Reservations re-check availability under the lock.
pub struct CatalogQuery<S> {
    store: S,
}

impl<S> CatalogQuery<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn available_products(&self) -> Result<Vec<ProductSummary>, InventoryError> {
        let products = self.store.list().await?;
        Ok(products
            .iter()
            .filter(|product| product.has_stock())
            .map(ProductSummary::from)
            .collect())
    }
}
