//! Reservation engine: the only writer of Item Ledger state.
//!
//! Every mutation runs the same pipeline under the product's lock:
//!
//! ```text
//! acquire product lock
//!   ↓
//! load Product (or an empty, unregistered one)
//!   ↓
//! handle command (pure validation + selection, produces events)
//!   ↓
//! apply events, save whole aggregate (compare-and-swap on loaded version)
//!   ↓
//! release lock (guard drop)
//! ```
//!
//! Rejections leave the pipeline before anything is saved.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use storefront_core::{
    Aggregate, AggregateRoot, DomainEvent, ExpectedVersion, ItemId, Money, OrderId, ProductId,
};

use crate::error::InventoryError;
use crate::lock::ReservationLockRegistry;
use crate::product::{Product, ProductCommand, ProductEvent, RegisterProduct, ReserveItems, StockItems};
use crate::store::ProductStore;

/// Items allocated to one reservation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationOutcome {
    /// Item ids in selection order.
    pub items: Vec<ItemId>,
    /// The product's price at allocation time (never above the expected price).
    pub unit_price: Money,
}

pub struct ReservationEngine<S> {
    store: S,
    locks: Arc<ReservationLockRegistry>,
}

impl<S> ReservationEngine<S>
where
    S: ProductStore,
{
    pub fn new(store: S, locks: Arc<ReservationLockRegistry>) -> Self {
        Self { store, locks }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locks(&self) -> &ReservationLockRegistry {
        &self.locks
    }

    /// Reserve `quantity` free items of `product_id` for `order_id`.
    ///
    /// Fails with `ProductUnavailable`, `InsufficientQuantity` or `PriceIncreased`
    /// without touching the ledger.
    pub async fn reserve(
        &self,
        order_id: &OrderId,
        product_id: &ProductId,
        quantity: u32,
        expected_unit_price: Money,
    ) -> Result<ReservationOutcome, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::validation("quantity must be a positive integer"));
        }

        let command = ReserveItems {
            order_id: order_id.clone(),
            product_id: product_id.clone(),
            quantity,
            expected_unit_price,
            occurred_at: Utc::now(),
        };

        let decided = self
            .decide_and_save(product_id, |product| {
                let reserved = product.decide_reservation(&command)?;
                let outcome = ReservationOutcome {
                    items: reserved.item_ids.clone(),
                    unit_price: reserved.unit_price,
                };
                Ok((vec![ProductEvent::ItemsReserved(reserved)], outcome))
            })
            .await;

        match decided {
            Ok((_, outcome)) => Ok(outcome),
            Err(err) => {
                if err.is_rejection() {
                    tracing::info!(
                        product_id = %product_id,
                        order_id = %order_id,
                        quantity,
                        expected_unit_price = %expected_unit_price,
                        error_code = err.code(),
                        "reservation rejected: {err}"
                    );
                } else {
                    tracing::error!(
                        product_id = %product_id,
                        order_id = %order_id,
                        "reservation failed: {err}"
                    );
                }
                Err(err)
            }
        }
    }

    /// Create a product with a price and no items.
    pub async fn register_product(
        &self,
        product_id: &ProductId,
        name: impl Into<String>,
        price: Money,
    ) -> Result<Product, InventoryError> {
        let command = ProductCommand::RegisterProduct(RegisterProduct {
            product_id: product_id.clone(),
            name: name.into(),
            price,
            occurred_at: Utc::now(),
        });
        self.execute(product_id, command).await
    }

    /// Append free items to a product.
    ///
    /// Runs under the same per-product lock as reservations, so a reservation
    /// never works from a ledger that is concurrently growing.
    pub async fn stock_items(
        &self,
        product_id: &ProductId,
        item_ids: Vec<ItemId>,
    ) -> Result<Product, InventoryError> {
        let command = ProductCommand::StockItems(StockItems {
            product_id: product_id.clone(),
            item_ids,
            occurred_at: Utc::now(),
        });
        self.execute(product_id, command).await
    }

    /// Current ledger of one product (unlocked read).
    pub async fn product(&self, product_id: &ProductId) -> Result<Option<Product>, InventoryError> {
        Ok(self.store.get(product_id).await?)
    }

    async fn execute(
        &self,
        product_id: &ProductId,
        command: ProductCommand,
    ) -> Result<Product, InventoryError> {
        let (product, ()) = self
            .decide_and_save(product_id, |product| Ok((product.handle(&command)?, ())))
            .await?;
        Ok(product)
    }

    /// Run `decide` against the locked, freshly loaded product, then apply and
    /// persist the events it returns alongside its own result.
    async fn decide_and_save<T, F>(
        &self,
        product_id: &ProductId,
        decide: F,
    ) -> Result<(Product, T), InventoryError>
    where
        F: FnOnce(&Product) -> Result<(Vec<ProductEvent>, T), InventoryError>,
    {
        let _guard = self.locks.acquire(product_id).await;

        let mut product = self
            .store
            .get(product_id)
            .await?
            .unwrap_or_else(|| Product::empty(product_id.clone()));
        let expected = ExpectedVersion::Exact(product.version());

        let (events, decided) = decide(&product)?;
        if events.is_empty() {
            return Ok((product, decided));
        }

        for event in &events {
            product.apply(event);
        }
        self.store.save(&product, expected).await?;

        for event in &events {
            tracing::info!(
                product_id = %product_id,
                event_type = event.event_type(),
                version = product.version(),
                available = product.available_quantity(),
                "ledger updated"
            );
        }

        Ok((product, decided))
    }
}
