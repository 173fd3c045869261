//! Account use cases: lookup, opening, address book maintenance.

use storefront_core::{AccountId, AddressId, AggregateRoot, ExpectedVersion};

use crate::account::{Account, Address, NewAddress};
use crate::error::AccountError;
use crate::store::AccountStore;

pub struct AccountService<S> {
    store: S,
}

impl<S> AccountService<S>
where
    S: AccountStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_account(&self, account_id: &AccountId) -> Result<Account, AccountError> {
        self.store
            .get(account_id)
            .await?
            .ok_or_else(|| AccountError::AccountNotFound(account_id.clone()))
    }

    pub async fn open_account(&self, name: &str) -> Result<Account, AccountError> {
        let account = Account::open(AccountId::generate(), name)?;
        self.store.save(&account, ExpectedVersion::Exact(0)).await?;
        tracing::info!(account_id = %account.account_id(), "account opened");
        Ok(account)
    }

    /// Append an address to an existing account and return it with its new id.
    ///
    /// A concurrent edit of the same account surfaces as `Store(Conflict)`.
    pub async fn add_address(
        &self,
        account_id: &AccountId,
        new: NewAddress,
    ) -> Result<Address, AccountError> {
        let mut account = self.get_account(account_id).await?;
        let expected = ExpectedVersion::Exact(account.version());

        let address = account.add_address(AddressId::generate(), new)?.clone();
        self.store.save(&account, expected).await?;

        tracing::info!(
            account_id = %account_id,
            address_id = %address.address_id,
            "address added"
        );
        Ok(address)
    }
}
