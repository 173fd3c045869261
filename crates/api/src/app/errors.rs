//! Error envelope: `{"errors":[{"code","title","message"}]}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use storefront_accounts::AccountError;
use storefront_core::DomainError;
use storefront_inventory::InventoryError;
use storefront_orders::OrderError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: String,
    pub title: String,
    pub message: String,
}

pub fn json_error(
    status: StatusCode,
    code: &str,
    title: &str,
    message: impl Into<String>,
) -> Response {
    let body = ErrorBody {
        errors: vec![ErrorEntry {
            code: code.to_string(),
            title: title.to_string(),
            message: message.into(),
        }],
    };
    (status, axum::Json(body)).into_response()
}

pub fn inventory_error_to_response(err: InventoryError) -> Response {
    let status = match &err {
        InventoryError::ProductUnavailable { .. }
        | InventoryError::InsufficientQuantity { .. }
        | InventoryError::PriceIncreased { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        InventoryError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        InventoryError::ProductAlreadyExists(_) | InventoryError::DuplicateItem { .. } => {
            StatusCode::CONFLICT
        }
        InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
        InventoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        InventoryError::Remote { .. } => StatusCode::BAD_GATEWAY,
    };
    respond(status, err.code(), err.title(), &err)
}

pub fn account_error_to_response(err: AccountError) -> Response {
    let status = match &err {
        AccountError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        AccountError::Validation(_) => StatusCode::BAD_REQUEST,
        AccountError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AccountError::Remote { .. } => StatusCode::BAD_GATEWAY,
    };
    respond(status, err.code(), err.title(), &err)
}

pub fn order_error_to_response(err: OrderError) -> Response {
    let status = match &err {
        OrderError::AccountNotFound(_)
        | OrderError::ShippingAddressNotFound { .. }
        | OrderError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrderError::ItemReservationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OrderError::Validation(_) => StatusCode::BAD_REQUEST,
        OrderError::Collaborator(_) | OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    respond(status, err.code(), err.title(), &err)
}

/// Unparseable or schema-mismatched JSON body.
pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "9001",
        "Malformed Request",
        rejection.body_text(),
    )
}

/// A blank or otherwise invalid identifier in the path or body.
pub fn invalid_id(code: &str, err: DomainError) -> Response {
    json_error(StatusCode::BAD_REQUEST, code, "Invalid Request", err.to_string())
}

fn respond(status: StatusCode, code: &str, title: &str, err: &dyn std::error::Error) -> Response {
    if status.is_server_error() {
        tracing::error!(error_code = code, "request failed: {err}");
    }
    json_error(status, code, title, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{AccountId, ProductId, StoreError};

    #[test]
    fn rejections_are_unprocessable() {
        let res = inventory_error_to_response(InventoryError::ProductUnavailable {
            product_id: ProductId::new("prod-1"),
        });
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = order_error_to_response(OrderError::ItemReservationFailed("nope".to_string()));
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_things_are_not_found() {
        let res = account_error_to_response(AccountError::AccountNotFound(AccountId::new("a")));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = order_error_to_response(OrderError::AccountNotFound(AccountId::new("a")));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_are_internal() {
        let res = inventory_error_to_response(InventoryError::Store(StoreError::backend("down")));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = order_error_to_response(OrderError::Collaborator("down".to_string()));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
