use axum_shop_api::dto::orders::{CartItemInput, PlaceOrderRequest};
use axum_shop_api::error::AppError;
use axum_shop_api::services::order_service::{OrderHistoryRow, group_history, validate_cart};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

fn row(order_id: Uuid, total: Decimal, name: &str, quantity: i32, price: Decimal) -> OrderHistoryRow {
    OrderHistoryRow {
        order_id,
        total_amount: total,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        product_name: name.to_string(),
        quantity,
        price,
    }
}

#[test]
fn fold_groups_interleaved_rows_by_order() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let total_a = Decimal::new(3997, 2);
    let total_b = Decimal::new(500, 2);

    // Rows of the two orders interleave; grouping must keep first-seen order.
    let rows = vec![
        row(first, total_a, "Mug", 2, Decimal::new(999, 2)),
        row(second, total_b, "Pen", 1, Decimal::new(500, 2)),
        row(first, total_a, "Poster", 1, Decimal::new(1999, 2)),
    ];

    let grouped = group_history(rows);

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].order_id, first);
    assert_eq!(grouped[0].total_amount, total_a);
    assert_eq!(grouped[0].items.len(), 2);
    assert_eq!(grouped[0].items[0].product_name, "Mug");
    assert_eq!(grouped[0].items[1].product_name, "Poster");
    assert_eq!(grouped[1].order_id, second);
    assert_eq!(grouped[1].items.len(), 1);
    assert_eq!(grouped[1].items[0].product_name, "Pen");
}

#[test]
fn fold_of_no_rows_is_empty() {
    assert!(group_history(Vec::new()).is_empty());
}

#[test]
fn fold_keeps_item_arrival_order_within_one_order() {
    let order = Uuid::new_v4();
    let total = Decimal::new(6000, 2);
    let rows = vec![
        row(order, total, "First", 1, Decimal::new(1000, 2)),
        row(order, total, "Second", 1, Decimal::new(2000, 2)),
        row(order, total, "Third", 1, Decimal::new(3000, 2)),
    ];

    let grouped = group_history(rows);

    assert_eq!(grouped.len(), 1);
    let names: Vec<&str> = grouped[0]
        .items
        .iter()
        .map(|i| i.product_name.as_str())
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

#[test]
fn empty_cart_is_rejected() {
    let err = validate_cart(&[]).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(m) if m == "Cart is empty"));
}

#[test]
fn non_positive_quantity_is_rejected() {
    for quantity in [0, -3] {
        let cart = [CartItemInput {
            id: Uuid::new_v4(),
            quantity,
            price: Decimal::new(999, 2),
        }];
        let err = validate_cart(&cart).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(m) if m == "Cart has invalid quantity"));
    }
}

#[test]
fn negative_price_is_rejected() {
    let cart = [CartItemInput {
        id: Uuid::new_v4(),
        quantity: 1,
        price: Decimal::new(-1, 2),
    }];
    let err = validate_cart(&cart).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(m) if m == "Cart has invalid price"));
}

#[test]
fn checkout_request_parses_the_storefront_body() {
    let mug = Uuid::new_v4();
    let poster = Uuid::new_v4();
    // The storefront posts whole product objects; fields beyond id, quantity
    // and price are ignored.
    let body = serde_json::json!({
        "cartItems": [
            {
                "id": mug,
                "name": "Mug",
                "description": "Stoneware, 350 ml",
                "price": 9.99,
                "stock": 10,
                "image_url": "/images/mug.jpg",
                "quantity": 2
            },
            { "id": poster, "quantity": 1, "price": 19.99 }
        ],
        "totalAmount": 39.97
    });

    let req: PlaceOrderRequest = serde_json::from_value(body).expect("storefront body parses");

    assert_eq!(req.total_amount, Decimal::new(3997, 2));
    assert_eq!(req.cart_items.len(), 2);
    assert_eq!(req.cart_items[0].id, mug);
    assert_eq!(req.cart_items[0].quantity, 2);
    assert_eq!(req.cart_items[0].price, Decimal::new(999, 2));
    assert_eq!(req.cart_items[1].id, poster);
    assert_eq!(req.cart_items[1].quantity, 1);
    assert_eq!(req.cart_items[1].price, Decimal::new(1999, 2));
}

#[test]
fn checkout_request_without_cart_items_is_an_empty_cart() {
    let req: PlaceOrderRequest =
        serde_json::from_value(serde_json::json!({ "totalAmount": 0.0 }))
            .expect("bare body parses");
    assert!(req.cart_items.is_empty());

    let err = validate_cart(&req.cart_items).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(m) if m == "Cart is empty"));
}

#[test]
fn valid_cart_passes() {
    let cart = [
        CartItemInput {
            id: Uuid::new_v4(),
            quantity: 2,
            price: Decimal::new(999, 2),
        },
        CartItemInput {
            id: Uuid::new_v4(),
            quantity: 1,
            price: Decimal::ZERO,
        },
    ];
    assert!(validate_cart(&cart).is_ok());
}
