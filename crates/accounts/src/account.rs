use serde::{Deserialize, Serialize};

use storefront_core::{AccountId, AddressId, AggregateRoot, DomainError, DomainResult};

/// Shipping/billing address attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: AddressId,
    pub line_one: String,
    #[serde(default)]
    pub line_two: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
}

/// Address fields supplied by the caller; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub line_one: String,
    #[serde(default)]
    pub line_two: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: String,
}

impl NewAddress {
    fn validate(&self) -> DomainResult<()> {
        let required = [
            ("lineOne", &self.line_one),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("pinCode", &self.pin_code),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(DomainError::validation(format!("{field} cannot be empty"))),
            None => Ok(()),
        }
    }

    fn into_address(self, address_id: AddressId) -> Address {
        Address {
            address_id,
            line_one: self.line_one.trim().to_string(),
            line_two: self
                .line_two
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.trim().to_string(),
            pin_code: self.pin_code.trim().to_string(),
        }
    }
}

/// Aggregate root: Account (a customer with its address book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    account_id: AccountId,
    name: String,
    addresses: Vec<Address>,
    version: u64,
}

impl Account {
    /// A freshly opened account. Its first state is version 1; the store
    /// accepts it only where no document exists yet.
    pub fn open(account_id: AccountId, name: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            account_id,
            name: name.to_string(),
            addresses: Vec::new(),
            version: 1,
        })
    }

    /// Read-only copy of an account served by another accounts instance.
    /// Version 0: it was never loaded from this process's store.
    pub fn restore(account_id: AccountId, name: String, addresses: Vec<Address>) -> Self {
        Self {
            account_id,
            name,
            addresses,
            version: 0,
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn address(&self, address_id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.address_id == address_id)
    }

    /// Append an address and bump the version.
    pub fn add_address(&mut self, address_id: AddressId, new: NewAddress) -> DomainResult<&Address> {
        new.validate()?;
        if self.address(&address_id).is_some() {
            return Err(DomainError::invariant(format!(
                "address {address_id} already exists on account {}",
                self.account_id
            )));
        }
        self.addresses.push(new.into_address(address_id));
        self.version += 1;
        Ok(&self.addresses[self.addresses.len() - 1])
    }
}

impl AggregateRoot for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.account_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
