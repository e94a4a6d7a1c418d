use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CartItemInput, OrderHistoryItem, OrderSummary, PlaceOrderRequest, PlaceOrderResponse},
    entity::{
        order_items::ActiveModel as OrderItemActive,
        orders::ActiveModel as OrderActive,
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    state::AppState,
};

/// Reject carts that must not reach storage. Runs before the transaction is
/// opened so a bad cart has no side effects at all.
pub fn validate_cart(items: &[CartItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        if item.price < Decimal::ZERO {
            return Err(AppError::BadRequest("Cart has invalid price".into()));
        }
    }
    Ok(())
}

/// Record a checkout as one atomic unit: one order row, one line item per
/// cart entry, and a stock decrement per entry. Any failure rolls the whole
/// transaction back, so readers never see a partial order.
pub async fn place_order(
    state: &AppState,
    payload: PlaceOrderRequest,
) -> AppResult<PlaceOrderResponse> {
    validate_cart(&payload.cart_items)?;

    let txn = state.orm.begin().await?;

    // Duplicate cart lines for one product must be satisfiable together, so
    // stock is checked against the summed quantity per product.
    let mut required: Vec<(Uuid, i64)> = Vec::new();
    for item in &payload.cart_items {
        match required.iter_mut().find(|(id, _)| *id == item.id) {
            Some((_, quantity)) => *quantity += i64::from(item.quantity),
            None => required.push((item.id, i64::from(item.quantity))),
        }
    }
    // Lock in id order so carts naming the same products in opposite orders
    // queue instead of deadlocking.
    required.sort_unstable_by_key(|(id, _)| *id);

    // Lock each referenced product row for the rest of the transaction.
    // Concurrent checkouts against the same product serialize here.
    for (product_id, quantity) in &required {
        let product = Products::find_by_id(*product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or(AppError::UnknownProduct(*product_id))?;
        if i64::from(product.stock) < *quantity {
            return Err(AppError::OutOfStock(*product_id));
        }
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        total_amount: Set(payload.total_amount),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for item in &payload.cart_items {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.id),
            quantity: Set(item.quantity),
            price: Set(item.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        // Conditional decrement: stock never goes below zero even if the
        // locked check above is ever weakened.
        let updated = Products::update_many()
            .col_expr(
                ProductCol::Stock,
                Expr::col(ProductCol::Stock).sub(item.quantity),
            )
            .filter(
                Condition::all()
                    .add(ProductCol::Id.eq(item.id))
                    .add(ProductCol::Stock.gte(item.quantity)),
            )
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(AppError::OutOfStock(item.id));
        }
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_place",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "items": payload.cart_items.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(PlaceOrderResponse {
        message: "Order placed successfully!".into(),
        order_id: order.id,
    })
}

/// One row of the denormalized history join: order fields repeated per line
/// item.
#[derive(Debug, sqlx::FromRow)]
pub struct OrderHistoryRow {
    pub order_id: Uuid,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// Fetch every past order with its line items, most recent order first.
/// Orders sharing a `created_at` keep the backend's row order; within one
/// order, items appear in row-arrival order. Pure read, safe to repeat.
pub async fn list_order_history(state: &AppState) -> AppResult<Vec<OrderSummary>> {
    let rows = sqlx::query_as::<_, OrderHistoryRow>(
        r#"
        SELECT
            o.id AS order_id,
            o.total_amount,
            o.created_at,
            p.name AS product_name,
            oi.quantity,
            oi.price
        FROM orders o
        INNER JOIN order_items oi ON o.id = oi.order_id
        INNER JOIN products p ON oi.product_id = p.id
        ORDER BY o.created_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(group_history(rows))
}

/// Fold the flat join into one group per order id. Grouping keeps first-seen
/// order, so the result follows the query's ordering even when rows of
/// different orders interleave. Never panics.
pub fn group_history(rows: Vec<OrderHistoryRow>) -> Vec<OrderSummary> {
    let mut grouped: Vec<OrderSummary> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let slot = match index.get(&row.order_id) {
            Some(&slot) => slot,
            None => {
                grouped.push(OrderSummary {
                    order_id: row.order_id,
                    total_amount: row.total_amount,
                    created_at: row.created_at,
                    items: Vec::new(),
                });
                index.insert(row.order_id, grouped.len() - 1);
                grouped.len() - 1
            }
        };
        if let Some(summary) = grouped.get_mut(slot) {
            summary.items.push(OrderHistoryItem {
                product_name: row.product_name,
                quantity: row.quantity,
                price: row.price,
            });
        }
    }

    grouped
}
