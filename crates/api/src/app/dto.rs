use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_accounts::{Account, Address};
use storefront_core::{AccountId, AddressId, ItemId, Money, OrderId, ProductId};
use storefront_inventory::{Product, ProductSummary, ReservationOutcome};
use storefront_orders::Order;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProductRequest {
    /// Generated when absent.
    pub product_id: Option<String>,
    pub product_name: String,
    pub price: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemsRequest {
    pub item_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveItemsRequest {
    pub order_id: String,
    pub quantity: u32,
    pub expected_price: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAccountRequest {
    pub name: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveItemsResponse {
    pub items: Vec<ItemId>,
    pub current_price: Money,
}

impl From<ReservationOutcome> for ReserveItemsResponse {
    fn from(outcome: ReservationOutcome) -> Self {
        Self {
            items: outcome.items,
            current_price: outcome.unit_price,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub available_quantity: usize,
    pub total_quantity: usize,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id_typed().clone(),
            product_name: product.name().to_string(),
            price: product.price(),
            available_quantity: product.available_quantity(),
            total_quantity: product.items().len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub account_id: AccountId,
    pub name: String,
    pub addresses: Vec<Address>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id().clone(),
            name: account.name().to_string(),
            addresses: account.addresses().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCreatedResponse {
    pub address_id: AddressId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub order_id: OrderId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub product_id: ProductId,
    pub items: Vec<ItemId>,
    pub bill_amount: Money,
    pub order_timestamp: DateTime<Utc>,
    pub shipping_address: Address,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            account_id: order.account_id,
            product_id: order.product_id,
            items: order.items,
            bill_amount: order.bill_amount,
            order_timestamp: order.order_timestamp,
            shipping_address: order.shipping_address,
        }
    }
}
