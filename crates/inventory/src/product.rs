use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, AggregateRoot, DomainEvent, ItemId, Money, OrderId, ProductId};

use crate::error::InventoryError;
use crate::item::Item;

/// Aggregate root: Product (the Item Ledger of one catalog entry).
///
/// Read and persisted as one whole document: catalog data plus every physical
/// item with its reservation state, in stocking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
    items: Vec<Item>,
    version: u64,
}

impl Product {
    /// Create an empty, not-yet-registered aggregate instance.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            price: Money::ZERO,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// A product exists once its registration event has been applied.
    pub fn is_registered(&self) -> bool {
        self.version > 0
    }

    /// Free items in ledger order.
    pub fn unreserved_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_free())
    }

    pub fn available_quantity(&self) -> usize {
        self.unreserved_items().count()
    }

    pub fn has_stock(&self) -> bool {
        self.items.iter().any(Item::is_free)
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: StockItems (append new free items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItems {
    pub product_id: ProductId,
    pub item_ids: Vec<ItemId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReserveItems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveItems {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub expected_unit_price: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    RegisterProduct(RegisterProduct),
    StockItems(StockItems),
    ReserveItems(ReserveItems),
}

/// Event: ProductRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRegistered {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemsStocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsStocked {
    pub product_id: ProductId,
    pub item_ids: Vec<ItemId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemsReserved.
///
/// `item_ids` are in selection order; `unit_price` is the price charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsReserved {
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub item_ids: Vec<ItemId>,
    pub unit_price: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductRegistered(ProductRegistered),
    ItemsStocked(ItemsStocked),
    ItemsReserved(ItemsReserved),
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductRegistered(_) => "inventory.product.registered",
            ProductEvent::ItemsStocked(_) => "inventory.items.stocked",
            ProductEvent::ItemsReserved(_) => "inventory.items.reserved",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductRegistered(e) => e.occurred_at,
            ProductEvent::ItemsStocked(e) => e.occurred_at,
            ProductEvent::ItemsReserved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = InventoryError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductRegistered(e) => {
                self.id = e.product_id.clone();
                self.name = e.name.clone();
                self.price = e.price;
                self.items.clear();
            }
            ProductEvent::ItemsStocked(e) => {
                self.items.extend(e.item_ids.iter().cloned().map(Item::new));
            }
            ProductEvent::ItemsReserved(e) => {
                let selected: HashSet<&ItemId> = e.item_ids.iter().collect();
                for item in self.items.iter_mut() {
                    if selected.contains(item.id()) && !item.reserve(&e.order_id) {
                        // Write-once: the earlier reservation stands.
                        tracing::error!(
                            product_id = %self.id,
                            item_id = %item.id(),
                            order_id = %e.order_id,
                            reserved_by = ?item.reserved_by(),
                            "reserved event selected an item that is already reserved"
                        );
                    }
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::RegisterProduct(cmd) => self.handle_register(cmd),
            ProductCommand::StockItems(cmd) => self.handle_stock(cmd),
            ProductCommand::ReserveItems(cmd) => self.handle_reserve(cmd),
        }
    }
}

impl Product {
    fn handle_register(&self, cmd: &RegisterProduct) -> Result<Vec<ProductEvent>, InventoryError> {
        if self.is_registered() {
            return Err(InventoryError::ProductAlreadyExists(cmd.product_id.clone()));
        }
        if cmd.name.trim().is_empty() {
            return Err(InventoryError::validation("product name cannot be empty"));
        }
        if cmd.price.is_negative() {
            return Err(InventoryError::validation("price cannot be negative"));
        }

        Ok(vec![ProductEvent::ProductRegistered(ProductRegistered {
            product_id: cmd.product_id.clone(),
            name: cmd.name.trim().to_string(),
            price: cmd.price,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_stock(&self, cmd: &StockItems) -> Result<Vec<ProductEvent>, InventoryError> {
        if !self.is_registered() {
            return Err(InventoryError::ProductNotFound(cmd.product_id.clone()));
        }
        if cmd.item_ids.is_empty() {
            return Err(InventoryError::validation("at least one item id is required"));
        }

        let mut seen: HashSet<&ItemId> = self.items.iter().map(Item::id).collect();
        for item_id in &cmd.item_ids {
            if item_id.as_str().trim().is_empty() {
                return Err(InventoryError::validation("item id cannot be blank"));
            }
            if !seen.insert(item_id) {
                return Err(InventoryError::DuplicateItem {
                    product_id: self.id.clone(),
                    item_id: item_id.clone(),
                });
            }
        }

        Ok(vec![ProductEvent::ItemsStocked(ItemsStocked {
            product_id: self.id.clone(),
            item_ids: cmd.item_ids.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reserve(&self, cmd: &ReserveItems) -> Result<Vec<ProductEvent>, InventoryError> {
        self.decide_reservation(cmd)
            .map(|reserved| vec![ProductEvent::ItemsReserved(reserved)])
    }

    /// Validate a reservation and select its items without mutating the ledger.
    pub fn decide_reservation(&self, cmd: &ReserveItems) -> Result<ItemsReserved, InventoryError> {
        if cmd.quantity == 0 {
            return Err(InventoryError::validation("quantity must be a positive integer"));
        }

        let available = self.available_quantity();
        if !self.is_registered() || available == 0 {
            return Err(InventoryError::ProductUnavailable {
                product_id: cmd.product_id.clone(),
            });
        }

        let requested = cmd.quantity as usize;
        if available < requested {
            return Err(InventoryError::InsufficientQuantity {
                product_id: self.id.clone(),
                requested: cmd.quantity,
                available,
            });
        }

        if self.price > cmd.expected_unit_price {
            return Err(InventoryError::PriceIncreased {
                product_id: self.id.clone(),
                expected: cmd.expected_unit_price,
                current: self.price,
            });
        }

        // First-free-first-selected, in ledger order.
        let item_ids: Vec<ItemId> = self
            .unreserved_items()
            .take(requested)
            .map(|item| item.id().clone())
            .collect();

        Ok(ItemsReserved {
            product_id: self.id.clone(),
            order_id: cmd.order_id.clone(),
            item_ids,
            unit_price: self.price,
            occurred_at: cmd.occurred_at,
        })
    }
}
