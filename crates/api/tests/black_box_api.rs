use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use storefront_api::app::{build_router, services::AppServices};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over in-memory stores, bound to an ephemeral port.
        let app = build_router(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    /// Post a JSON body verbatim, so numeric literals reach the server with every digit.
    async fn post_raw(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    /// `prod-456` at 2222.25 with items `item-a1`, `item-a2`.
    async fn seed_laptop(&self) {
        let (status, _) = self
            .post(
                "/products",
                json!({"productId": "prod-456", "productName": "Laptop", "price": "2222.25"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .post("/products/prod-456/items", json!({"itemIds": ["item-a1", "item-a2"]}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["availableQuantity"], 2);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn reserve_allocates_first_free_items_then_reports_unavailable() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;

    let (status, body) = srv
        .post(
            "/products/prod-456/reserve",
            json!({"orderId": "order-123", "quantity": 2, "expectedPrice": "2400.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": ["item-a1", "item-a2"], "currentPrice": "2222.25"}));

    let (status, body) = srv
        .post(
            "/products/prod-456/reserve",
            json!({"orderId": "order-124", "quantity": 1, "expectedPrice": "2400.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        first_error(&body),
        &json!({
            "code": "2001",
            "title": "Product Not Available",
            "message": "Product not available with id: prod-456",
        })
    );
}

#[tokio::test]
async fn reserve_rejections_carry_codes_and_messages() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;

    let (status, body) = srv
        .post(
            "/products/prod-456/reserve",
            json!({"orderId": "order-1", "quantity": 3, "expectedPrice": "2400.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&body)["code"], "2002");
    assert_eq!(
        first_error(&body)["message"],
        "3 quantity of product with id prod-456 is not available. Available quantity is: 2"
    );

    let (status, body) = srv
        .post(
            "/products/prod-456/reserve",
            json!({"orderId": "order-1", "quantity": 2, "expectedPrice": "2000.00"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&body)["code"], "2003");
    assert_eq!(
        first_error(&body)["message"],
        "Product price is more than expected for product with id: prod-456. Expected: 2000.00, Current: 2222.25"
    );

    // Nothing was reserved by the rejected attempts.
    let (_, product) = srv.get("/products/prod-456").await;
    assert_eq!(product["availableQuantity"], 2);
}

#[tokio::test]
async fn numeric_expected_price_is_compared_without_float_rounding() {
    let srv = TestServer::spawn().await;
    let (status, _) = srv
        .post(
            "/products",
            json!({"productId": "prod-big", "productName": "Yacht", "price": "12345678901234567.89"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    srv.post("/products/prod-big/items", json!({"itemIds": ["hull-1"]}))
        .await;

    // One cent below the price; a binary float would round both to the same value.
    let (status, body) = srv
        .post_raw(
            "/products/prod-big/reserve",
            r#"{"orderId": "order-1", "quantity": 1, "expectedPrice": 12345678901234567.88}"#,
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&body)["code"], "2003");
    assert_eq!(
        first_error(&body)["message"],
        "Product price is more than expected for product with id: prod-big. Expected: 12345678901234567.88, Current: 12345678901234567.89"
    );

    let (status, body) = srv
        .post_raw(
            "/products/prod-big/reserve",
            r#"{"orderId": "order-1", "quantity": 1, "expectedPrice": 12345678901234567.89}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"items": ["hull-1"], "currentPrice": "12345678901234567.89"}));
}

#[tokio::test]
async fn numeric_expected_price_per_item_places_an_order() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;
    let (_, account) = srv.post("/accounts", json!({"name": "Ada Lovelace"})).await;
    let account_id = account["accountId"].as_str().unwrap().to_string();
    let (_, created) = srv
        .post(
            &format!("/accounts/{account_id}/addresses"),
            json!({
                "lineOne": "12 St James's Square",
                "city": "London",
                "state": "London",
                "country": "UK",
                "pinCode": "SW1Y 4JH",
            }),
        )
        .await;
    let address_id = created["addressId"].as_str().unwrap().to_string();

    let order = |quantity: u32, expected: &str| {
        format!(
            r#"{{"accountId": "{account_id}", "productId": "prod-456", "quantity": {quantity}, "expectedPricePerItem": {expected}, "shippingAddressId": "{address_id}"}}"#
        )
    };

    let (status, body) = srv.post_raw("/orders", &order(1, "2222.24")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&body)["code"], "3002");
    assert_eq!(
        first_error(&body)["message"],
        "Product price is more than expected for product with id: prod-456. Expected: 2222.24, Current: 2222.25"
    );

    let (status, placed) = srv.post_raw("/orders", &order(2, "2222.25")).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, order) = srv
        .get(&format!("/orders/{}", placed["orderId"].as_str().unwrap()))
        .await;
    assert_eq!(order["billAmount"], "4444.50");
}

#[tokio::test]
async fn catalog_lists_only_products_with_free_items() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;
    let (status, _) = srv
        .post(
            "/products",
            json!({"productId": "prod-empty", "productName": "Phantom", "price": 10}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = srv.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"products": [{"productId": "prod-456", "productName": "Laptop", "price": "2222.25"}]})
    );
}

#[tokio::test]
async fn malformed_body_and_duplicates_are_client_errors() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;

    let (status, body) = srv
        .post("/products/prod-456/reserve", json!({"orderId": "order-1", "quantity": -1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["code"], "9001");

    let (status, body) = srv
        .post(
            "/products",
            json!({"productId": "prod-456", "productName": "Laptop", "price": "1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(first_error(&body)["code"], "2005");

    let (status, body) = srv.get("/products/prod-missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_error(&body)["code"], "2004");
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get("/accounts/acc-missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        first_error(&body),
        &json!({
            "code": "1001",
            "title": "Account Not Found",
            "message": "Account not found with id: acc-missing",
        })
    );
}

#[tokio::test]
async fn order_flow_account_address_order() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;

    let (status, account) = srv.post("/accounts", json!({"name": "Ada Lovelace"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let account_id = account["accountId"].as_str().unwrap().to_string();

    let (status, created) = srv
        .post(
            &format!("/accounts/{account_id}/addresses"),
            json!({
                "lineOne": "12 St James's Square",
                "city": "London",
                "state": "London",
                "country": "UK",
                "pinCode": "SW1Y 4JH",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let address_id = created["addressId"].as_str().unwrap().to_string();

    let (status, placed) = srv
        .post(
            "/orders",
            json!({
                "accountId": account_id,
                "productId": "prod-456",
                "quantity": 2,
                "expectedPricePerItem": "2300.00",
                "shippingAddressId": address_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = placed["orderId"].as_str().unwrap().to_string();

    let (status, order) = srv.get(&format!("/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["items"], json!(["item-a1", "item-a2"]));
    assert_eq!(order["billAmount"], "4444.50");
    assert_eq!(order["shippingAddress"]["addressId"], address_id);
    assert_eq!(order["shippingAddress"]["city"], "London");

    // Sold out now: the next order fails at the reservation step.
    let (status, body) = srv
        .post(
            "/orders",
            json!({
                "accountId": account_id,
                "productId": "prod-456",
                "quantity": 1,
                "expectedPricePerItem": "2300.00",
                "shippingAddressId": address_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(first_error(&body)["code"], "3002");
    assert_eq!(first_error(&body)["title"], "Unable to place order");
    assert_eq!(
        first_error(&body)["message"],
        "Product not available with id: prod-456"
    );
}

#[tokio::test]
async fn order_for_unknown_account_or_address_is_not_found() {
    let srv = TestServer::spawn().await;
    srv.seed_laptop().await;

    let (status, body) = srv
        .post(
            "/orders",
            json!({
                "accountId": "acc-missing",
                "productId": "prod-456",
                "quantity": 1,
                "expectedPricePerItem": "2300.00",
                "shippingAddressId": "addr-1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_error(&body)["code"], "3001");

    let (_, account) = srv.post("/accounts", json!({"name": "Ada Lovelace"})).await;
    let account_id = account["accountId"].as_str().unwrap().to_string();
    let (status, body) = srv
        .post(
            "/orders",
            json!({
                "accountId": account_id,
                "productId": "prod-456",
                "quantity": 1,
                "expectedPricePerItem": "2300.00",
                "shippingAddressId": "addr-missing",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(first_error(&body)["code"], "3004");

    // Neither failure consumed stock.
    let (_, product) = srv.get("/products/prod-456").await;
    assert_eq!(product["availableQuantity"], 2);
}

#[tokio::test]
async fn concurrent_reservations_never_share_items() {
    let srv = Arc::new(TestServer::spawn().await);
    srv.seed_laptop().await;

    let attempts: Vec<_> = (0..10)
        .map(|i| {
            let srv = srv.clone();
            tokio::spawn(async move {
                srv.post(
                    "/products/prod-456/reserve",
                    json!({"orderId": format!("order-{i}"), "quantity": 1, "expectedPrice": "2222.25"}),
                )
                .await
            })
        })
        .collect();

    let mut allocated = Vec::new();
    let mut rejected = 0;
    for attempt in attempts {
        let (status, body) = attempt.await.unwrap();
        if status == StatusCode::OK {
            allocated.extend(body["items"].as_array().unwrap().iter().cloned());
        } else {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            rejected += 1;
        }
    }

    allocated.sort_by_key(|v| v.as_str().unwrap().to_string());
    assert_eq!(allocated, vec![json!("item-a1"), json!("item-a2")]);
    assert_eq!(rejected, 8);
}
