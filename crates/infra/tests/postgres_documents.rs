//! Round trips against a live Postgres.
//!
//! Run with `DATABASE_URL=postgres://… cargo test -p storefront-infra -- --ignored`.

use chrono::Utc;
use rust_decimal_macros::dec;

use storefront_core::{
    Aggregate, AggregateRoot, ExpectedVersion, ItemId, Money, OrderId, ProductId, StoreError,
};
use storefront_infra::{PostgresStores, connect, migrate};
use storefront_inventory::{
    Product, ProductCommand, ProductStore, RegisterProduct, ReserveItems, StockItems,
};

async fn stores() -> PostgresStores {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    let pool = connect(&url, 4).await.expect("connect");
    migrate(&pool).await.expect("migrate");
    PostgresStores::new(pool)
}

fn step(product: &mut Product, command: ProductCommand) {
    for event in product.handle(&command).unwrap() {
        product.apply(&event);
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn product_documents_use_compare_and_swap() {
    let stores = stores().await;
    let product_id = ProductId::generate();

    let mut product = Product::empty(product_id.clone());
    step(
        &mut product,
        ProductCommand::RegisterProduct(RegisterProduct {
            product_id: product_id.clone(),
            name: "Laptop".to_string(),
            price: Money::new(dec!(2222.25)),
            occurred_at: Utc::now(),
        }),
    );
    step(
        &mut product,
        ProductCommand::StockItems(StockItems {
            product_id: product_id.clone(),
            item_ids: vec![ItemId::new("item-a1"), ItemId::new("item-a2")],
            occurred_at: Utc::now(),
        }),
    );
    stores.products.save(&product, ExpectedVersion::Exact(0)).await.unwrap();

    // A second insert of the same id loses.
    let err = stores
        .products
        .save(&product, ExpectedVersion::Exact(0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let loaded = stores.products.get(&product_id).await.unwrap().unwrap();
    assert_eq!(loaded, product);

    // Two writers start from the same version; only the first one lands.
    let base = loaded.version();
    let mut first = loaded.clone();
    step(
        &mut first,
        ProductCommand::ReserveItems(ReserveItems {
            order_id: OrderId::new("order-1"),
            product_id: product_id.clone(),
            quantity: 1,
            expected_unit_price: Money::new(dec!(2400)),
            occurred_at: Utc::now(),
        }),
    );
    let mut second = loaded;
    step(
        &mut second,
        ProductCommand::ReserveItems(ReserveItems {
            order_id: OrderId::new("order-2"),
            product_id: product_id.clone(),
            quantity: 1,
            expected_unit_price: Money::new(dec!(2400)),
            occurred_at: Utc::now(),
        }),
    );

    stores.products.save(&first, ExpectedVersion::Exact(base)).await.unwrap();
    let err = stores
        .products
        .save(&second, ExpectedVersion::Exact(base))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let stored = stores.products.get(&product_id).await.unwrap().unwrap();
    assert_eq!(stored, first);
    assert_eq!(stored.available_quantity(), 1);
}
