//! Payment Error Types

use thiserror::Error;

use crate::order::OrderStatus;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Order-lifecycle errors
///
/// A signature mismatch is not listed here: it is recorded on the order and
/// reported through [`crate::Verification::Rejected`].
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Payment-order API call failed (network, auth, validation)
    #[error("Upstream order error: {0}")]
    UpstreamOrder(String),

    /// Verification referenced an unknown order
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order amount must be a positive whole number of rupees
    #[error("Invalid amount: {0}")]
    InvalidAmount(u64),

    /// Order already reached a terminal status
    #[error("Order {order_id} already {status}")]
    AlreadySettled { order_id: String, status: OrderStatus },

    /// Order store failure
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::UpstreamOrder(_))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::UpstreamOrder(_) => "Order creation failed",
            PaymentError::OrderNotFound(_) => "Order not found",
            PaymentError::InvalidAmount(_) => "Amount must be a positive number",
            PaymentError::AlreadySettled { status: OrderStatus::Paid, .. } => "Order already paid",
            PaymentError::AlreadySettled { .. } => "Order already failed",
            PaymentError::Config(_) => "Service configuration error.",
            PaymentError::Store(_) => "An error occurred processing your request.",
        }
    }
}

/// Order store errors
///
/// Integrity failures; none of these occur in normal operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate order id: {0}")]
    DuplicateKey(String),

    #[error("order not found: {0}")]
    NotFound(String),

    /// Compare-and-swap lost: the stored status was no longer the expected one
    #[error("order {order_id} is {actual}, expected {expected}")]
    Conflict {
        order_id: String,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("store lock poisoned")]
    Poisoned,
}
