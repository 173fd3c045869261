//! Infrastructure layer: Postgres persistence for every storage port.

pub mod document_store;
pub mod schema;
pub mod stores;

pub use document_store::PostgresDocumentStore;
pub use schema::{connect, migrate};
pub use stores::{
    PostgresAccountStore, PostgresOrderStore, PostgresProductStore, PostgresStores,
};
