use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_accounts::Address;
use storefront_core::{AccountId, AddressId, AggregateRoot, ItemId, Money, OrderId, ProductId};

/// Request to place an order for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub account_id: AccountId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub expected_price_per_item: Money,
    pub shipping_address_id: AddressId,
}

/// A placed order. Written once, never modified.
///
/// The shipping address is a copy taken at placement time; later edits to the
/// account's address book do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub product_id: ProductId,
    pub items: Vec<ItemId>,
    pub bill_amount: Money,
    pub order_timestamp: DateTime<Utc>,
    pub shipping_address: Address,
    #[serde(default = "first_version")]
    pub version: u64,
}

fn first_version() -> u64 {
    1
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.order_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
