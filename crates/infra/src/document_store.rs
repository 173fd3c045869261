//! Postgres-backed document store.
//!
//! Every collection (products, accounts, orders) shares one `documents` table
//! keyed by `(collection, id)`. A document is written whole, as JSONB, together
//! with its aggregate version.
//!
//! ## Conditional writes
//!
//! | `ExpectedVersion` | statement | zero rows affected means |
//! |---|---|---|
//! | `Exact(0)` | `INSERT … ON CONFLICT DO NOTHING` | the document already exists |
//! | `Exact(v)` | `UPDATE … WHERE version = v` | another writer got there first (or the row is gone) |
//! | `Any` | `INSERT … ON CONFLICT DO UPDATE` | n/a |
//!
//! Zero affected rows is reported as `StoreError::Conflict`. This is what keeps
//! two service instances, which do not share reservation locks, from both
//! persisting an allocation of the same item.

use std::fmt::Display;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{PgPool, Row};
use tracing::instrument;

use storefront_core::{AggregateRoot, ExpectedVersion, StoreError};

/// One named collection of JSONB documents.
#[derive(Debug)]
pub struct PostgresDocumentStore<K, V> {
    pool: PgPool,
    collection: &'static str,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Clone for PostgresDocumentStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            collection: self.collection,
            _marker: PhantomData,
        }
    }
}

impl<K, V> PostgresDocumentStore<K, V> {
    pub fn new(pool: PgPool, collection: &'static str) -> Self {
        Self {
            pool,
            collection,
            _marker: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }
}

impl<K, V> PostgresDocumentStore<K, V>
where
    K: Display + Send + Sync,
    V: AggregateRoot<Id = K> + Serialize + DeserializeOwned + Send + Sync,
{
    #[instrument(skip(self), fields(collection = self.collection, id = %id), err)]
    pub async fn get(&self, id: &K) -> Result<Option<V>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(self.collection)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|row| decode_body(&row)).transpose()
    }

    /// All documents of the collection, ordered by id.
    #[instrument(skip(self), fields(collection = self.collection), err)]
    pub async fn list(&self) -> Result<Vec<V>, StoreError> {
        let rows = sqlx::query("SELECT body FROM documents WHERE collection = $1 ORDER BY id")
            .bind(self.collection)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(decode_body).collect()
    }

    #[instrument(
        skip(self, document),
        fields(collection = self.collection, id = %document.id(), version = document.version()),
        err
    )]
    pub async fn put(&self, document: &V, expected: ExpectedVersion) -> Result<(), StoreError> {
        let id = document.id().to_string();
        let version = to_db_version(document.version())?;
        let body =
            serde_json::to_value(document).map_err(|e| StoreError::serialization(e.to_string()))?;

        let query = match expected {
            ExpectedVersion::Exact(0) => sqlx::query(
                r#"
                INSERT INTO documents (collection, id, version, body)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (collection, id) DO NOTHING
                "#,
            )
            .bind(self.collection)
            .bind(&id)
            .bind(version)
            .bind(&body),
            ExpectedVersion::Exact(current) => sqlx::query(
                r#"
                UPDATE documents
                SET version = $3, body = $4, updated_at = NOW()
                WHERE collection = $1 AND id = $2 AND version = $5
                "#,
            )
            .bind(self.collection)
            .bind(&id)
            .bind(version)
            .bind(&body)
            .bind(to_db_version(current)?),
            ExpectedVersion::Any => sqlx::query(
                r#"
                INSERT INTO documents (collection, id, version, body)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (collection, id)
                DO UPDATE SET version = EXCLUDED.version, body = EXCLUDED.body, updated_at = NOW()
                "#,
            )
            .bind(self.collection)
            .bind(&id)
            .bind(version)
            .bind(&body),
        };

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("put", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "{}/{id}: stored version no longer matches {expected:?}",
                self.collection
            )));
        }
        Ok(())
    }
}

fn decode_body<V: DeserializeOwned>(row: &sqlx::postgres::PgRow) -> Result<V, StoreError> {
    let body: serde_json::Value = row
        .try_get("body")
        .map_err(|e| StoreError::serialization(format!("failed to read body column: {e}")))?;
    serde_json::from_value(body).map_err(|e| StoreError::serialization(e.to_string()))
}

fn to_db_version(version: u64) -> Result<i64, StoreError> {
    i64::try_from(version)
        .map_err(|_| StoreError::serialization(format!("version {version} exceeds BIGINT")))
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                // unique violation: a concurrent insert of the same id
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::backend(format!("connection pool closed in {operation}")),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::serialization(format!("decode error in {operation}: {err}"))
        }
        _ => StoreError::backend(format!("sqlx error in {operation}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_beyond_bigint_are_rejected() {
        assert_eq!(to_db_version(7).unwrap(), 7);
        assert!(matches!(
            to_db_version(u64::MAX),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn pool_closed_is_a_backend_failure() {
        let err = map_sqlx_error("get", sqlx::Error::PoolClosed);
        assert_eq!(err, StoreError::backend("connection pool closed in get"));
    }

    #[test]
    fn row_not_found_is_a_backend_failure() {
        let err = map_sqlx_error("list", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(msg) if msg.starts_with("sqlx error in list")));
    }
}
