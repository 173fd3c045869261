//! Inventory error taxonomy.

use thiserror::Error;

use storefront_core::{ItemId, Money, ProductId, StoreError};

/// Errors returned by the inventory operations.
///
/// The first three variants are the reservation rejections: expected,
/// caller-correctable, raised before any mutation. `Remote` carries the
/// outcome of a reservation made against another inventory instance over HTTP;
/// a 422 from it counts as a rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Product not available with id: {product_id}")]
    ProductUnavailable { product_id: ProductId },

    #[error(
        "{requested} quantity of product with id {product_id} is not available. Available quantity is: {available}"
    )]
    InsufficientQuantity {
        product_id: ProductId,
        requested: u32,
        available: usize,
    },

    #[error(
        "Product price is more than expected for product with id: {product_id}. Expected: {expected}, Current: {current}"
    )]
    PriceIncreased {
        product_id: ProductId,
        expected: Money,
        current: Money,
    },

    #[error("Product not found with id: {0}")]
    ProductNotFound(ProductId),

    #[error("Product already exists with id: {0}")]
    ProductAlreadyExists(ProductId),

    #[error("Item {item_id} is already stocked for product with id: {product_id}")]
    DuplicateItem { product_id: ProductId, item_id: ItemId },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{message}")]
    Remote { status: Option<u16>, message: String },
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for the reservation rejections (unavailable, short, price guard).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            InventoryError::ProductUnavailable { .. }
                | InventoryError::InsufficientQuantity { .. }
                | InventoryError::PriceIncreased { .. }
                | InventoryError::Remote {
                    status: Some(422),
                    ..
                }
        )
    }

    /// Stable error code exposed at the service boundary.
    pub fn code(&self) -> &'static str {
        match self {
            InventoryError::ProductUnavailable { .. } => "2001",
            InventoryError::InsufficientQuantity { .. } => "2002",
            InventoryError::PriceIncreased { .. } => "2003",
            InventoryError::ProductNotFound(_) => "2004",
            InventoryError::ProductAlreadyExists(_) => "2005",
            InventoryError::DuplicateItem { .. } => "2006",
            InventoryError::Validation(_) => "2007",
            InventoryError::Store(_) => "9000",
            InventoryError::Remote { .. } => "9002",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InventoryError::ProductUnavailable { .. } => "Product Not Available",
            InventoryError::InsufficientQuantity { .. } => "Product Available In Less Quantity",
            InventoryError::PriceIncreased { .. } => "Product Price More Than Expected",
            InventoryError::ProductNotFound(_) => "Product Not Found",
            InventoryError::ProductAlreadyExists(_) => "Product Already Exists",
            InventoryError::DuplicateItem { .. } => "Duplicate Item",
            InventoryError::Validation(_) => "Invalid Request",
            InventoryError::Store(_) | InventoryError::Remote { .. } => "Unable to process request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn messages_carry_diagnostics() {
        let err = InventoryError::InsufficientQuantity {
            product_id: ProductId::new("prod-456"),
            requested: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "3 quantity of product with id prod-456 is not available. Available quantity is: 2"
        );

        let err = InventoryError::PriceIncreased {
            product_id: ProductId::new("prod-456"),
            expected: Money::new(dec!(2000.00)),
            current: Money::new(dec!(2222.25)),
        };
        assert_eq!(
            err.to_string(),
            "Product price is more than expected for product with id: prod-456. Expected: 2000.00, Current: 2222.25"
        );
    }

    #[test]
    fn only_reservation_outcomes_are_rejections() {
        let unavailable = InventoryError::ProductUnavailable {
            product_id: ProductId::new("p"),
        };
        assert!(unavailable.is_rejection());
        assert_eq!(unavailable.code(), "2001");

        let store = InventoryError::Store(StoreError::backend("down"));
        assert!(!store.is_rejection());
        assert_eq!(store.code(), "9000");
    }

    #[test]
    fn remote_unprocessable_is_a_rejection_other_statuses_are_not() {
        let refused = InventoryError::Remote {
            status: Some(422),
            message: "Product not available with id: p".to_string(),
        };
        assert!(refused.is_rejection());
        assert_eq!(refused.to_string(), "Product not available with id: p");

        for status in [Some(400), Some(404), Some(503), None] {
            let failed = InventoryError::Remote {
                status,
                message: "boom".to_string(),
            };
            assert!(!failed.is_rejection());
            assert_eq!(failed.code(), "9002");
        }
    }
}
