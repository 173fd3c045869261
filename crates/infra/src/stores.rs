//! Storage port implementations over [`PostgresDocumentStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use storefront_accounts::{Account, AccountStore};
use storefront_core::{AccountId, ExpectedVersion, OrderId, ProductId, StoreError};
use storefront_inventory::{Product, ProductStore};
use storefront_orders::{Order, OrderStore};

use crate::document_store::PostgresDocumentStore;

pub type PostgresProductStore = PostgresDocumentStore<ProductId, Product>;
pub type PostgresAccountStore = PostgresDocumentStore<AccountId, Account>;
pub type PostgresOrderStore = PostgresDocumentStore<OrderId, Order>;

pub const PRODUCTS: &str = "products";
pub const ACCOUNTS: &str = "accounts";
pub const ORDERS: &str = "orders";

/// The three collections over one pool.
#[derive(Debug, Clone)]
pub struct PostgresStores {
    pub products: PostgresProductStore,
    pub accounts: PostgresAccountStore,
    pub orders: PostgresOrderStore,
}

impl PostgresStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            products: PostgresDocumentStore::new(pool.clone(), PRODUCTS),
            accounts: PostgresDocumentStore::new(pool.clone(), ACCOUNTS),
            orders: PostgresDocumentStore::new(pool, ORDERS),
        }
    }
}

#[async_trait]
impl ProductStore for PostgresDocumentStore<ProductId, Product> {
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        PostgresDocumentStore::get(self, product_id).await
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        PostgresDocumentStore::list(self).await
    }

    async fn save(&self, product: &Product, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.put(product, expected).await
    }
}

#[async_trait]
impl AccountStore for PostgresDocumentStore<AccountId, Account> {
    async fn get(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        PostgresDocumentStore::get(self, account_id).await
    }

    async fn save(&self, account: &Account, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.put(account, expected).await
    }
}

#[async_trait]
impl OrderStore for PostgresDocumentStore<OrderId, Order> {
    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
        PostgresDocumentStore::get(self, order_id).await
    }

    async fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.put(order, expected).await
    }
}
