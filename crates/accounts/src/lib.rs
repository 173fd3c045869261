//! Accounts: customers and their address books.

pub mod account;
pub mod error;
pub mod service;
pub mod store;

pub use account::{Account, Address, NewAddress};
pub use error::AccountError;
pub use service::AccountService;
pub use store::{AccountStore, InMemoryAccountStore};
