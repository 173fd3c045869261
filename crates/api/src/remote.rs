//! HTTP clients for order placement's collaborators, used when accounts and
//! inventory run as separate deployments of this API.
//!
//! | remote answer | account lookup | item reservation |
//! |---|---|---|
//! | 2xx | decoded account | decoded allocation |
//! | 404 | `AccountNotFound` | `Remote` (not a rejection) |
//! | 422 | `Remote` | `Remote` rejection carrying the remote message |
//! | other / transport | `Remote` | `Remote` |

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};

use storefront_accounts::{Account, AccountError};
use storefront_core::{AccountId, Money, OrderId, ProductId};
use storefront_inventory::{InventoryError, ReservationOutcome};
use storefront_orders::{AccountDirectory, ItemReservations};

use crate::app::dto;
use crate::app::errors::ErrorBody;

/// `GET {base}/accounts/{id}` against a remote accounts service.
#[derive(Debug, Clone)]
pub struct HttpAccountDirectory {
    client: Client,
    base_url: Url,
}

impl HttpAccountDirectory {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl AccountDirectory for HttpAccountDirectory {
    async fn get_account(&self, account_id: &AccountId) -> Result<Account, AccountError> {
        let remote = |status: Option<StatusCode>, message: String| AccountError::Remote {
            status: status.map(|s| s.as_u16()),
            message,
        };

        let url = endpoint(&self.base_url, &["accounts", account_id.as_str()])
            .map_err(|message| remote(None, message))?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| remote(None, format!("GET {url}: {err}")))?;

        match response.status() {
            status if status.is_success() => {
                let view: dto::AccountView = response
                    .json()
                    .await
                    .map_err(|err| remote(Some(status), format!("GET {url}: undecodable account: {err}")))?;
                Ok(Account::restore(view.account_id, view.name, view.addresses))
            }
            StatusCode::NOT_FOUND => Err(AccountError::AccountNotFound(account_id.clone())),
            status => {
                let message = failure_message(response).await;
                tracing::warn!(%url, status = status.as_u16(), "account lookup failed: {message}");
                Err(remote(Some(status), format!("GET {url} responded {status}: {message}")))
            }
        }
    }
}

/// `POST {base}/products/{id}/reserve` against a remote inventory service.
#[derive(Debug, Clone)]
pub struct HttpItemReservations {
    client: Client,
    base_url: Url,
}

impl HttpItemReservations {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl ItemReservations for HttpItemReservations {
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        product_id: &ProductId,
        quantity: u32,
        expected_unit_price: Money,
    ) -> Result<ReservationOutcome, InventoryError> {
        let remote = |status: Option<StatusCode>, message: String| InventoryError::Remote {
            status: status.map(|s| s.as_u16()),
            message,
        };

        let url = endpoint(&self.base_url, &["products", product_id.as_str(), "reserve"])
            .map_err(|message| remote(None, message))?;
        let body = dto::ReserveItemsRequest {
            order_id: order_id.to_string(),
            quantity,
            expected_price: expected_unit_price,
        };
        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| remote(None, format!("POST {url}: {err}")))?;

        match response.status() {
            status if status.is_success() => {
                let reserved: dto::ReserveItemsResponse = response
                    .json()
                    .await
                    .map_err(|err| remote(Some(status), format!("POST {url}: undecodable allocation: {err}")))?;
                Ok(ReservationOutcome {
                    items: reserved.items,
                    unit_price: reserved.current_price,
                })
            }
            StatusCode::UNPROCESSABLE_ENTITY => Err(remote(
                Some(StatusCode::UNPROCESSABLE_ENTITY),
                failure_message(response).await,
            )),
            status => {
                let message = failure_message(response).await;
                tracing::warn!(%url, status = status.as_u16(), "remote reservation failed: {message}");
                Err(remote(Some(status), format!("POST {url} responded {status}: {message}")))
            }
        }
    }
}

/// `base` with `segments` appended as percent-encoded path segments.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| format!("{base} cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// First message of an error envelope, or the raw body when it is not one.
async fn failure_message(response: Response) -> String {
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => return format!("unreadable body: {err}"),
    };
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => match body.errors.into_iter().next() {
            Some(entry) => entry.message,
            None => text,
        },
        Err(_) => text,
    }
}
