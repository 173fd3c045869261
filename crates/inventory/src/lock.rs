//! Per-product reservation locks.
//!
//! ## Known limitation
//!
//! These locks are local to one process. Several engine instances sharing one
//! document store are NOT serialized by this registry; across instances the
//! only protection is the store's version check, which turns a lost race into
//! a `StoreError::Conflict` instead of a double allocation. A deployment with
//! more than one instance needs a distributed lock (or conflict retry) on top.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use storefront_core::ProductId;

/// Exclusive handle guarding one product's ledger.
pub type ProductLock = Arc<AsyncMutex<()>>;

/// Hands out one lock per product id, created on first use and kept forever.
///
/// Reservations against the same product are serialized; different products
/// never contend. The id-to-lock map has its own mutex so two first-time
/// callers for one id always receive the same handle.
#[derive(Debug, Default)]
pub struct ReservationLockRegistry {
    locks: Mutex<HashMap<ProductId, ProductLock>>,
}

impl ReservationLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock handle for `product_id` (idempotent).
    pub fn lock_for(&self, product_id: &ProductId) -> ProductLock {
        // The map is never left half-updated, so a poisoned guard is still usable.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(product_id.clone()).or_default().clone()
    }

    /// Wait for exclusive ownership of `product_id`.
    ///
    /// The lock is released when the returned guard is dropped, on every exit path.
    pub async fn acquire(&self, product_id: &ProductId) -> OwnedMutexGuard<()> {
        self.lock_for(product_id).lock_owned().await
    }

    /// Number of product locks created so far.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
