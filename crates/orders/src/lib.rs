//! Orders: placement orchestration over the account and inventory services.

pub mod error;
pub mod order;
pub mod ports;
pub mod service;
pub mod store;

pub use error::OrderError;
pub use order::{Order, PlaceOrder};
pub use ports::{AccountDirectory, ItemReservations};
pub use service::OrderService;
pub use store::{InMemoryOrderStore, OrderStore};
