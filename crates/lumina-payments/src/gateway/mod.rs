//! Payment-Order Gateway
//!
//! Abstraction over the provider's order-creation API.

mod mock;
mod razorpay;

pub use mock::MockOrderGateway;
pub use razorpay::{RazorpayClient, RazorpayConfig};

use async_trait::async_trait;
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result};
use crate::order::CURRENCY;

/// Minor units (paise) per rupee
pub const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// Order-creation request as sent to the provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Amount in minor units (paise)
    pub amount: u64,
    pub currency: String,
    /// Opaque receipt token
    pub receipt: String,
}

impl NewOrder {
    /// Build a request for `amount` rupees with a fresh receipt token
    pub fn for_amount(amount: u64) -> Result<Self> {
        if amount == 0 {
            return Err(PaymentError::InvalidAmount(amount));
        }
        let minor = amount
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .ok_or(PaymentError::InvalidAmount(amount))?;

        Ok(Self {
            amount: minor,
            currency: CURRENCY.to_string(),
            receipt: receipt_token(),
        })
    }
}

/// Provider order object, returned verbatim to the client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderOrder {
    pub id: String,
    #[serde(default = "default_entity")]
    pub entity: String,
    /// Minor units
    pub amount: u64,
    #[serde(default)]
    pub amount_paid: u64,
    #[serde(default)]
    pub amount_due: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub notes: serde_json::Value,
    /// Unix seconds
    #[serde(default)]
    pub created_at: i64,
    /// Anything else the provider sends, kept so the object round-trips
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_entity() -> String {
    "order".into()
}

/// Payment-order API (Strategy pattern)
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order with the provider
    async fn create_order(&self, request: &NewOrder) -> Result<ProviderOrder>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// `"order_"` followed by 6 hex-encoded bytes from the OS CSPRNG
pub fn receipt_token() -> String {
    let mut bytes = [0u8; 6];
    OsRng.fill_bytes(&mut bytes);
    format!("order_{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_scaled_to_paise() {
        let request = NewOrder::for_amount(10).unwrap();
        assert_eq!(request.amount, 1000);
        assert_eq!(request.currency, "INR");
    }

    #[test]
    fn test_order_currency_matches_checkout() {
        let request = NewOrder::for_amount(10).unwrap();
        let checkout = lumina_core::CheckoutConfig::premium("rzp_test_key");
        assert_eq!(request.currency, checkout.currency);
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(matches!(
            NewOrder::for_amount(0),
            Err(PaymentError::InvalidAmount(0))
        ));
    }

    #[test]
    fn test_overflowing_amount_rejected() {
        assert!(NewOrder::for_amount(u64::MAX).is_err());
    }

    #[test]
    fn test_receipt_token_shape() {
        let a = receipt_token();
        let b = receipt_token();
        assert!(a.starts_with("order_"));
        assert_eq!(a.len(), "order_".len() + 12);
        assert_ne!(a, b);
    }

    #[test]
    fn test_provider_order_tolerates_missing_fields() {
        let order: ProviderOrder = serde_json::from_str(
            r#"{"id":"order_abc","amount":1000,"currency":"INR","status":"created"}"#,
        )
        .unwrap();
        assert_eq!(order.entity, "order");
        assert_eq!(order.amount_due, 0);
        assert!(order.receipt.is_none());
    }

    #[test]
    fn test_provider_order_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "id": "order_abc",
            "amount": 1000,
            "currency": "INR",
            "status": "created",
            "offer_id": "offer_10off",
            "partial_payment": false,
        });

        let order: ProviderOrder = serde_json::from_value(raw).unwrap();
        assert_eq!(order.extra["offer_id"], "offer_10off");

        let echoed = serde_json::to_value(&order).unwrap();
        assert_eq!(echoed["offer_id"], "offer_10off");
        assert_eq!(echoed["partial_payment"], false);
        assert_eq!(echoed["id"], "order_abc");
    }
}
