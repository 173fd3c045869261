//! In-memory document storage for tests/dev.
//!
//! Each document is an [`AggregateRoot`] stored whole under its id. Writes are
//! compare-and-swap on the aggregate version, mirroring the conditional update
//! the Postgres adapter performs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::aggregate::{AggregateRoot, ExpectedVersion};
use crate::error::StoreError;

/// In-memory document collection keyed by aggregate id.
#[derive(Debug)]
pub struct InMemoryDocumentStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryDocumentStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryDocumentStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> InMemoryDocumentStore<K, V>
where
    K: Clone + Ord,
    V: AggregateRoot<Id = K> + Clone,
{
    pub fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    /// All documents, ordered by id.
    pub fn list(&self) -> Result<Vec<V>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    /// Replace (or insert) a whole document if the stored version matches `expected`.
    pub fn put(&self, document: &V, expected: ExpectedVersion) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let current = map.get(document.id()).map(AggregateRoot::version).unwrap_or(0);
        expected.check(current)?;
        map.insert(document.id().clone(), document.clone());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::backend("in-memory store lock poisoned")
}
