//! Application State

use std::sync::Arc;

use lumina_core::CheckoutConfig;
use lumina_payments::OrderService;

/// Payment components, present only when provider credentials are configured
pub struct Payments {
    /// Order lifecycle service (holds the signing secret)
    pub orders: OrderService,

    /// Public widget configuration
    pub checkout: CheckoutConfig,
}

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    /// Payments (optional - None if not configured)
    pub payments: Option<Arc<Payments>>,
}

impl AppState {
    pub fn with_payments(orders: OrderService, checkout: CheckoutConfig) -> Self {
        Self {
            payments: Some(Arc::new(Payments { orders, checkout })),
        }
    }
}
