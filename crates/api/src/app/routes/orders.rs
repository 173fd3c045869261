use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use storefront_core::OrderId;
use storefront_orders::PlaceOrder;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order))
        .route("/:id", get(get_order))
}

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<PlaceOrder>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    match services.orders.place_order(request).await {
        Ok(order_id) => {
            (StatusCode::CREATED, Json(dto::OrderCreatedResponse { order_id })).into_response()
        }
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let order_id: OrderId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::invalid_id("3006", e),
    };
    match services.orders.get_order(&order_id).await {
        Ok(order) => (StatusCode::OK, Json(dto::OrderView::from(order))).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}
