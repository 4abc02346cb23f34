//! LuminaTemp HTTP Server
//!
//! Serves the order API and the WASM frontend.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lumina_core::CheckoutConfig;
use lumina_payments::{MemoryOrderStore, OrderService, RazorpayClient};
use lumina_server::{AppState, ServerConfig, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Initialize payments
    let state = match RazorpayClient::from_env() {
        Ok(client) => {
            let checkout = CheckoutConfig::premium(client.config().key_id.clone());
            let secret = client.config().key_secret.clone();
            let orders = OrderService::new(
                Arc::new(client),
                Arc::new(MemoryOrderStore::new()),
                secret,
            );
            tracing::info!("✓ Razorpay configured");
            AppState::with_payments(orders, checkout)
        }
        Err(e) => {
            tracing::warn!("⚠ Razorpay not configured - payments disabled ({})", e);
            tracing::warn!("  Set RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET in .env");
            AppState::default()
        }
    };

    // Static files (WASM frontend)
    let app = router(state)
        .fallback_service(tower_http::services::ServeDir::new(&config.static_dir));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("LuminaTemp server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  GET  /api/checkout/config  - Checkout widget config");
    tracing::info!("  POST /api/create-order     - Create payment order");
    tracing::info!("  POST /api/verify-payment   - Verify payment signature");
    tracing::info!("  GET  /api/orders           - List orders");

    axum::serve(listener, app).await?;

    Ok(())
}
