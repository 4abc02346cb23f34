//! Wire Types
//!
//! JSON bodies exchanged between the web client and the server.

use serde::{Deserialize, Serialize};

use crate::pricing;

/// `POST /api/create-order` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Rupees
    pub amount: u64,
}

/// The fields of the provider order object the client relies on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    /// Paise
    pub amount: u64,
    pub currency: String,
}

/// `POST /api/verify-payment` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// `POST /api/verify-payment` reply for 200 and 400
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
}

impl VerifyPaymentResponse {
    pub fn verified() -> Self {
        Self {
            success: true,
            message: "Payment verified successfully".into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Error body for every other non-2xx reply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// `GET /api/checkout/config` reply: everything the widget needs except the order id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Public key id
    pub key: String,
    /// Rupees
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub theme_color: String,
}

impl CheckoutConfig {
    /// Premium product under the given public key
    pub fn premium(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            amount: pricing::PREMIUM_PRICE_INR,
            currency: pricing::CURRENCY.into(),
            name: pricing::PRODUCT_NAME.into(),
            description: pricing::PRODUCT_DESCRIPTION.into(),
            theme_color: pricing::THEME_COLOR.into(),
        }
    }
}
