//! Storage port for account documents.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{AccountId, ExpectedVersion, InMemoryDocumentStore, StoreError};

use crate::account::Account;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError>;

    async fn save(&self, account: &Account, expected: ExpectedVersion) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn get(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        (**self).get(account_id).await
    }

    async fn save(&self, account: &Account, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).save(account, expected).await
    }
}

pub type InMemoryAccountStore = InMemoryDocumentStore<AccountId, Account>;

#[async_trait]
impl AccountStore for InMemoryDocumentStore<AccountId, Account> {
    async fn get(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        InMemoryDocumentStore::get(self, account_id)
    }

    async fn save(&self, account: &Account, expected: ExpectedVersion) -> Result<(), StoreError> {
        self.put(account, expected)
    }
}
