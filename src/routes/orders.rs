use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::{
    dto::orders::{OrderSummary, PlaceOrderRequest, PlaceOrderResponse},
    error::AppError,
    services::order_service,
    state::AppState,
};

// The deployed storefront depends on the exact shapes these two endpoints
// return, so they bypass the ApiResponse envelope used everywhere else.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/history", get(order_history))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = PlaceOrderResponse),
        (status = 400, description = "Empty or invalid cart, unknown product, or insufficient stock"),
        (status = 500, description = "Order could not be persisted"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), CheckoutError> {
    let resp = order_service::place_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/history",
    responses(
        (status = 200, description = "Past orders, most recent first", body = Vec<OrderSummary>),
        (status = 500, description = "History query failed"),
    ),
    tag = "Orders"
)]
pub async fn order_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderSummary>>, HistoryError> {
    let summaries = order_service::list_order_history(&state).await?;
    Ok(Json(summaries))
}

#[derive(Serialize)]
struct CheckoutFailure {
    message: String,
}

/// Adapter that renders checkout failures in the legacy flat shape:
/// `{"message": ...}`, with storage errors prefixed `Failed to place order:`.
pub struct CheckoutError(AppError);

impl From<AppError> for CheckoutError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let message = if status.is_server_error() {
            format!("Failed to place order: {}", self.0)
        } else {
            self.0.to_string()
        };
        (status, Json(CheckoutFailure { message })).into_response()
    }
}

#[derive(Serialize)]
struct HistoryFailure {
    error: String,
}

/// Adapter for the history endpoint's legacy error shape: `{"error": ...}`.
pub struct HistoryError(AppError);

impl From<AppError> for HistoryError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let error = self.0.to_string();
        (status, Json(HistoryFailure { error })).into_response()
    }
}
