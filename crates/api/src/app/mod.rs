//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per service)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: the error envelope and per-domain status mapping

use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::{AppServices, RemoteCollaborators};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let remote = RemoteCollaborators::from_config(&config.collaborators)
        .context("failed to build collaborator HTTP client")?;
    let services = AppServices::from_storage(&config.storage, remote)
        .await
        .context("failed to initialise storage")?;
    Ok(build_router(Arc::new(services)))
}

/// Router over already-built services (tests wire in-memory services here).
pub fn build_router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::request_tracing())
                .layer(Extension(services)),
        )
}
