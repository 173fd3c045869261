use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use storefront_accounts::NewAddress;
use storefront_core::AccountId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(open_account))
        .route("/:id", get(get_account))
        .route("/:id/addresses", post(add_address))
}

fn parse_account_id(raw: &str) -> Result<AccountId, Response> {
    raw.parse().map_err(|e| errors::invalid_id("1002", e))
}

pub async fn open_account(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::OpenAccountRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    match services.accounts.open_account(&body.name).await {
        Ok(account) => (StatusCode::CREATED, Json(dto::AccountView::from(&account))).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let account_id = match parse_account_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.accounts.get_account(&account_id).await {
        Ok(account) => (StatusCode::OK, Json(dto::AccountView::from(&account))).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn add_address(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<NewAddress>, JsonRejection>,
) -> Response {
    let account_id = match parse_account_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    match services.accounts.add_address(&account_id, body).await {
        Ok(address) => (
            StatusCode::CREATED,
            Json(dto::AddressCreatedResponse {
                address_id: address.address_id,
            }),
        )
            .into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}
