//! Error Types

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for payment-flow operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Payment flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Checkout script could not be injected or loaded
    #[error("Checkout script failed to load: {0}")]
    AssetLoad(String),

    /// Backend call failed (network, 5xx, malformed body)
    #[error("Payment backend error: {0}")]
    Backend(String),

    /// Widget never resolved the handshake
    #[error("Checkout did not respond within {0:?}")]
    CallbackTimeout(std::time::Duration),

    /// Widget could not be constructed or opened
    #[error("Checkout widget error: {0}")]
    Widget(String),

    /// A second trigger arrived while a flow was running
    #[error("A payment is already in progress")]
    InProgress,
}

impl FlowError {
    /// Check if the user can simply trigger the flow again
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FlowError::InProgress)
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            FlowError::AssetLoad(_) => "Razorpay SDK failed to load. Check your internet connection.",
            FlowError::Backend(_) => "Payment service is unavailable. Please try again.",
            FlowError::CallbackTimeout(_) => "The payment window timed out. Please try again.",
            FlowError::Widget(_) => "Could not open the payment window.",
            FlowError::InProgress => "A payment is already in progress.",
        }
    }
}

/// A capability-gated action was refused because the access window is over
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Session expired at {expired_at}")]
pub struct AccessDenied {
    pub expired_at: DateTime<Utc>,
}
