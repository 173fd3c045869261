//! Order placement.
//!
//! Placement calls its collaborators in sequence: account lookup, one item
//! reservation, order persistence. There is no compensation: if persisting
//! the order fails after the reservation succeeded, the reserved items stay
//! reserved and the failure is reported to the caller.

use chrono::Utc;

use storefront_accounts::AccountError;
use storefront_core::{ExpectedVersion, OrderId};
use storefront_inventory::InventoryError;

use crate::error::OrderError;
use crate::order::{Order, PlaceOrder};
use crate::ports::{AccountDirectory, ItemReservations};
use crate::store::OrderStore;

pub struct OrderService<A, R, S> {
    accounts: A,
    reservations: R,
    store: S,
}

impl<A, R, S> OrderService<A, R, S>
where
    A: AccountDirectory,
    R: ItemReservations,
    S: OrderStore,
{
    pub fn new(accounts: A, reservations: R, store: S) -> Self {
        Self {
            accounts,
            reservations,
            store,
        }
    }

    pub async fn place_order(&self, request: PlaceOrder) -> Result<OrderId, OrderError> {
        validate(&request)?;

        let account = self
            .accounts
            .get_account(&request.account_id)
            .await
            .map_err(|err| match err {
                AccountError::AccountNotFound(id) => OrderError::AccountNotFound(id),
                other => OrderError::Collaborator(other.to_string()),
            })?;

        let shipping_address = account
            .address(&request.shipping_address_id)
            .cloned()
            .ok_or_else(|| OrderError::ShippingAddressNotFound {
                account_id: request.account_id.clone(),
                address_id: request.shipping_address_id.clone(),
            })?;

        let order_id = OrderId::generate();
        let outcome = self
            .reservations
            .reserve_items(
                &order_id,
                &request.product_id,
                request.quantity,
                request.expected_price_per_item,
            )
            .await
            .map_err(|err| reservation_failure(&order_id, err))?;

        let bill_amount = outcome.unit_price.times(request.quantity).ok_or_else(|| {
            OrderError::Collaborator(format!(
                "bill amount overflow for {} x {}",
                outcome.unit_price, request.quantity
            ))
        })?;

        let order = Order {
            order_id: order_id.clone(),
            account_id: request.account_id,
            product_id: request.product_id,
            items: outcome.items,
            bill_amount,
            order_timestamp: Utc::now(),
            shipping_address,
            version: 1,
        };
        self.store.save(&order, ExpectedVersion::Exact(0)).await?;

        tracing::info!(
            order_id = %order.order_id,
            account_id = %order.account_id,
            product_id = %order.product_id,
            items = order.items.len(),
            bill_amount = %order.bill_amount,
            "order placed"
        );
        Ok(order_id)
    }

    pub async fn get_order(&self, order_id: &OrderId) -> Result<Order, OrderError> {
        self.store
            .get(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.clone()))
    }
}

fn validate(request: &PlaceOrder) -> Result<(), OrderError> {
    if request.quantity == 0 {
        return Err(OrderError::validation("quantity must be a positive integer"));
    }
    if request.expected_price_per_item.is_negative() {
        return Err(OrderError::validation("expectedPricePerItem cannot be negative"));
    }
    Ok(())
}

fn reservation_failure(order_id: &OrderId, err: InventoryError) -> OrderError {
    if err.is_rejection() {
        tracing::warn!(order_id = %order_id, error_code = err.code(), "reservation refused: {err}");
        OrderError::ItemReservationFailed(err.to_string())
    } else {
        tracing::error!(order_id = %order_id, "reservation failed: {err}");
        OrderError::Collaborator(err.to_string())
    }
}
