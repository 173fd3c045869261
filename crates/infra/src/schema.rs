//! Connection and schema bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use storefront_core::StoreError;

use crate::document_store::map_sqlx_error;

const DOCUMENTS_TABLE: &str = include_str!("../migrations/0001_documents.sql");

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create the `documents` table if it does not exist yet (idempotent).
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(DOCUMENTS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;
    tracing::info!("documents schema ready");
    Ok(())
}
