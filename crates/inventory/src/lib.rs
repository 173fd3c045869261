//! Inventory domain module: the Item Ledger and its reservation engine.
//!
//! Business rules live in the `Product` aggregate (pure, no IO). The engine
//! wraps them with per-product locking and persistence through the
//! `ProductStore` port.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod item;
pub mod lock;
pub mod product;
pub mod store;

pub use catalog::{CatalogQuery, ProductSummary};
pub use engine::{ReservationEngine, ReservationOutcome};
pub use error::InventoryError;
pub use item::{Item, ItemState};
pub use lock::{ProductLock, ReservationLockRegistry};
pub use product::{
    ItemsReserved, ItemsStocked, Product, ProductCommand, ProductEvent, ProductRegistered,
    RegisterProduct, ReserveItems, StockItems,
};
pub use store::{InMemoryProductStore, ProductStore};
