//! `storefront-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the accounts,
//! inventory and orders modules, plus the in-memory document store used for
//! tests and local development.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod event;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use document::InMemoryDocumentStore;
pub use error::{DomainError, DomainResult, StoreError};
pub use event::DomainEvent;
pub use id::{AccountId, AddressId, ItemId, OrderId, ProductId};
pub use money::Money;
pub use value_object::ValueObject;
