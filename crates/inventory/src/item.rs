use serde::{Deserialize, Serialize};

use storefront_core::{ItemId, OrderId};

/// Reservation state of a physical item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "order_id", rename_all = "snake_case")]
pub enum ItemState {
    Free,
    ReservedBy(OrderId),
}

/// One physical unit of a product.
///
/// The reservation is write-once: an item that is `ReservedBy` an order never
/// goes back to `Free`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    state: ItemState,
}

impl Item {
    /// A freshly stocked, unreserved item.
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            state: ItemState::Free,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn is_free(&self) -> bool {
        matches!(self.state, ItemState::Free)
    }

    pub fn reserved_by(&self) -> Option<&OrderId> {
        match &self.state {
            ItemState::Free => None,
            ItemState::ReservedBy(order_id) => Some(order_id),
        }
    }

    /// Reserve the item for `order_id`. Returns `false` if it was already taken.
    pub(crate) fn reserve(&mut self, order_id: &OrderId) -> bool {
        if !self.is_free() {
            return false;
        }
        self.state = ItemState::ReservedBy(order_id.clone());
        true
    }
}
