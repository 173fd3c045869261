use thiserror::Error;

use storefront_core::{AccountId, AddressId, OrderId, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Account not found with id: {0}")]
    AccountNotFound(AccountId),

    /// The inventory refused the reservation; carries its message.
    #[error("{0}")]
    ItemReservationFailed(String),

    /// A collaborator failed unexpectedly.
    #[error("{0}")]
    Collaborator(String),

    #[error("Shipping address not found with addressId: {address_id} and accountId: {account_id}")]
    ShippingAddressNotFound {
        account_id: AccountId,
        address_id: AddressId,
    },

    #[error("Order not found with id: {0}")]
    OrderNotFound(OrderId),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            OrderError::AccountNotFound(_) => "3001",
            OrderError::ItemReservationFailed(_) => "3002",
            OrderError::Collaborator(_) => "3003",
            OrderError::ShippingAddressNotFound { .. } => "3004",
            OrderError::OrderNotFound(_) => "3005",
            OrderError::Validation(_) => "3006",
            OrderError::Store(_) => "9000",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            OrderError::AccountNotFound(_) => "Account Not Found",
            OrderError::ItemReservationFailed(_) => "Unable to place order",
            OrderError::Collaborator(_) | OrderError::Store(_) => "Unable to process request",
            OrderError::ShippingAddressNotFound { .. } => "Shipping Address Not Found",
            OrderError::OrderNotFound(_) => "Order Not Found",
            OrderError::Validation(_) => "Invalid Request",
        }
    }
}
