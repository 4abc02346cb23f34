//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use lumina_core::{
    CheckoutConfig, CreateOrderRequest, ErrorBody, VerifyPaymentRequest, VerifyPaymentResponse,
};
use lumina_payments::{Order, PaymentError, ProviderOrder, Verification};

use crate::state::{AppState, Payments};

/// Error reply used by every handler
pub type ApiError = (StatusCode, Json<ErrorBody>);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
}

// ============================================================================
// Error mapping
// ============================================================================

fn error(status: StatusCode, message: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorBody::new(message, code)))
}

fn payments(state: &AppState) -> Result<&Payments, ApiError> {
    state.payments.as_deref().ok_or_else(|| {
        error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })
}

/// Map a service error; `fallback` is the body for unexpected failures
fn payment_error(err: &PaymentError, fallback: &str) -> ApiError {
    match err {
        PaymentError::OrderNotFound(_) => {
            error(StatusCode::NOT_FOUND, err.user_message(), "ORDER_NOT_FOUND")
        }
        PaymentError::InvalidAmount(_) => {
            error(StatusCode::BAD_REQUEST, err.user_message(), "INVALID_AMOUNT")
        }
        PaymentError::AlreadySettled { .. } => {
            error(StatusCode::CONFLICT, err.user_message(), "ORDER_SETTLED")
        }
        PaymentError::UpstreamOrder(_) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, fallback, "UPSTREAM_ERROR")
        }
        PaymentError::Store(_) | PaymentError::Config(_) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, fallback, "INTERNAL_ERROR")
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments.is_some(),
    })
}

/// Public checkout widget configuration
pub async fn checkout_config(
    State(state): State<AppState>,
) -> Result<Json<CheckoutConfig>, ApiError> {
    Ok(Json(payments(&state)?.checkout.clone()))
}

/// Create a provider order and persist it
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<ProviderOrder>, ApiError> {
    let payments = payments(&state)?;

    let created = payments
        .orders
        .create_order(payload.amount)
        .await
        .map_err(|e| {
            tracing::error!("Error creating order: {}", e);
            payment_error(&e, "Order creation failed")
        })?;

    Ok(Json(created.provider))
}

/// Verify the checkout signature and settle the order
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<(StatusCode, Json<VerifyPaymentResponse>), ApiError> {
    let payments = payments(&state)?;

    let verdict = payments
        .orders
        .verify_payment(&payload.order_id, &payload.payment_id, &payload.signature)
        .await
        .map_err(|e| {
            tracing::warn!(order_id = %payload.order_id, "Verification error: {}", e);
            payment_error(&e, "Verification failed")
        })?;

    Ok(match verdict {
        Verification::Verified(_) => (StatusCode::OK, Json(VerifyPaymentResponse::verified())),
        Verification::Rejected { reason, .. } => (
            StatusCode::BAD_REQUEST,
            Json(VerifyPaymentResponse::rejected(reason.message())),
        ),
    })
}

/// All persisted orders, newest first
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    let payments = payments(&state)?;

    let orders = payments.orders.list_orders().map_err(|e| {
        tracing::error!("Error listing orders: {}", e);
        payment_error(&e, "Failed to fetch orders")
    })?;

    Ok(Json(orders))
}
