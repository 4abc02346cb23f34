//! # lumina-server
//!
//! Axum HTTP surface for LuminaTemp: order creation, payment verification
//! and the order listing. The payment secret lives only in [`AppState`].

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;
pub use state::{AppState, Payments};

use crate::handlers::{checkout_config, create_order, health_check, list_orders, verify_payment};

/// API router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/checkout/config", get(checkout_config))

        // Orders
        .route("/api/create-order", post(create_order))
        .route("/api/verify-payment", post(verify_payment))
        .route("/api/orders", get(list_orders))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
