use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{ExpectedVersion, InMemoryDocumentStore, OrderId, StoreError};

use crate::order::Order;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get(order_id).await
    }

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).save(order, expected).await
    }
}

pub type InMemoryOrderStore = InMemoryDocumentStore<OrderId, Order>;

#[async_trait]
impl OrderStore for InMemoryDocumentStore<OrderId, Order> {
    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        InMemoryDocumentStore::get(self, order_id)
    }

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.put(order, expected)
    }
}
