use thiserror::Error;

use storefront_core::{AccountId, DomainError, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account not found with id: {0}")]
    AccountNotFound(AccountId),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A remote account directory failed or answered with an unexpected status.
    #[error("account directory error: {message}")]
    Remote { status: Option<u16>, message: String },
}

impl AccountError {
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::AccountNotFound(_) => "1001",
            AccountError::Validation(_) => "1002",
            AccountError::Store(_) => "9000",
            AccountError::Remote { .. } => "9002",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AccountError::AccountNotFound(_) => "Account Not Found",
            AccountError::Validation(_) => "Invalid Request",
            AccountError::Store(_) | AccountError::Remote { .. } => "Unable to process request",
        }
    }
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Conflict(msg) => AccountError::Store(StoreError::Conflict(msg)),
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => AccountError::Validation(msg),
        }
    }
}
