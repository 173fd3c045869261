use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use storefront_core::{ItemId, OrderId, ProductId};
use storefront_inventory::InventoryError;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(register_product))
        .route("/:id", get(get_product))
        .route("/:id/items", post(stock_items))
        .route("/:id/reserve", post(reserve_items))
}

fn parse_product_id(raw: &str) -> Result<ProductId, Response> {
    raw.parse().map_err(|e| errors::invalid_id("2007", e))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.catalog.available_products().await {
        Ok(products) => (StatusCode::OK, Json(dto::ProductsResponse { products })).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn register_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterProductRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let product_id = match body.product_id.as_deref() {
        Some(raw) => match parse_product_id(raw) {
            Ok(id) => id,
            Err(res) => return res,
        },
        None => ProductId::generate(),
    };

    match services
        .engine
        .register_product(&product_id, body.product_name, body.price)
        .await
    {
        Ok(product) => (StatusCode::CREATED, Json(dto::ProductView::from(&product))).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let product_id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.engine.product(&product_id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(dto::ProductView::from(&product))).into_response(),
        Ok(None) => errors::inventory_error_to_response(InventoryError::ProductNotFound(product_id)),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn stock_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StockItemsRequest>, JsonRejection>,
) -> Response {
    let product_id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let item_ids = body.item_ids.into_iter().map(ItemId::new).collect();

    match services.engine.stock_items(&product_id, item_ids).await {
        Ok(product) => (StatusCode::OK, Json(dto::ProductView::from(&product))).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn reserve_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::ReserveItemsRequest>, JsonRejection>,
) -> Response {
    let product_id = match parse_product_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let order_id: OrderId = match body.order_id.parse() {
        Ok(id) => id,
        Err(e) => return errors::invalid_id("2007", e),
    };

    match services
        .engine
        .reserve(&order_id, &product_id, body.quantity, body.expected_price)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(dto::ReserveItemsResponse::from(outcome))).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
