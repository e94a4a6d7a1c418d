use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One line of the submitted cart. The storefront sends whole product objects
/// here; everything beyond id, quantity and price is ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItemInput {
    pub id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

// A missing cartItems field is treated like an empty cart, not a parse error.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub cart_items: Vec<CartItemInput>,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    pub message: String,
    #[serde(rename = "orderId")]
    pub order_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderHistoryItem {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// One past order with its line items, as served by `/api/orders/history`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderHistoryItem>,
}
