//! Collaborators consumed by order placement.
//!
//! Implemented here for the in-process account service and reservation engine;
//! the API crate adds HTTP clients for separately deployed services.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_accounts::{Account, AccountError, AccountService, AccountStore};
use storefront_core::{AccountId, Money, OrderId, ProductId};
use storefront_inventory::{InventoryError, ProductStore, ReservationEngine, ReservationOutcome};

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn get_account(&self, account_id: &AccountId) -> Result<Account, AccountError>;
}

#[async_trait]
pub trait ItemReservations: Send + Sync {
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        product_id: &ProductId,
        quantity: u32,
        expected_unit_price: Money,
    ) -> Result<ReservationOutcome, InventoryError>;
}

#[async_trait]
impl<T> AccountDirectory for Arc<T>
where
    T: AccountDirectory + ?Sized,
{
    async fn get_account(&self, account_id: &AccountId) -> Result<Account, AccountError> {
        (**self).get_account(account_id).await
    }
}

#[async_trait]
impl<T> ItemReservations for Arc<T>
where
    T: ItemReservations + ?Sized,
{
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        product_id: &ProductId,
        quantity: u32,
        expected_unit_price: Money,
    ) -> Result<ReservationOutcome, InventoryError> {
        (**self)
            .reserve_items(order_id, product_id, quantity, expected_unit_price)
            .await
    }
}

#[async_trait]
impl<S> AccountDirectory for AccountService<S>
where
    S: AccountStore,
{
    async fn get_account(&self, account_id: &AccountId) -> Result<Account, AccountError> {
        AccountService::get_account(self, account_id).await
    }
}

#[async_trait]
impl<S> ItemReservations for ReservationEngine<S>
where
    S: ProductStore,
{
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        product_id: &ProductId,
        quantity: u32,
        expected_unit_price: Money,
    ) -> Result<ReservationOutcome, InventoryError> {
        self.reserve(order_id, product_id, quantity, expected_unit_price)
            .await
    }
}
