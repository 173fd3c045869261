use axum::Router;

pub mod accounts;
pub mod orders;
pub mod products;
pub mod system;

/// Router for the three services.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/accounts", accounts::router())
        .nest("/orders", orders::router())
}
