//! Storage port for Item Ledger documents.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{ExpectedVersion, InMemoryDocumentStore, ProductId, StoreError};

use crate::product::Product;

/// Persistence of whole `Product` aggregates.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Snapshot of every product (no consistency with in-flight reservations).
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Replace the stored document if its version still matches `expected`.
    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(product_id).await
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).save(product, expected).await
    }
}

/// In-memory product collection (tests/dev).
pub type InMemoryProductStore = InMemoryDocumentStore<ProductId, Product>;

#[async_trait]
impl ProductStore for InMemoryDocumentStore<ProductId, Product> {
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        InMemoryDocumentStore::get(self, product_id)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        InMemoryDocumentStore::list(self)
    }

    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.put(product, expected)
    }
}
