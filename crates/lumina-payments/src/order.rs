//! Order Records
//!
//! The durable record of a premium purchase, keyed by the provider-assigned
//! order id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use lumina_core::pricing::CURRENCY;

/// Order status
///
/// `Created` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Created)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Provider order id (primary key)
    pub order_id: String,

    /// Provider payment id, set by a verification attempt
    pub payment_id: Option<String>,

    /// Submitted signature, kept for audit
    pub signature: Option<String>,

    /// Owning user, if known
    #[serde(default)]
    pub user_id: Option<String>,

    /// Amount in major currency units (rupees)
    pub amount: u64,

    pub currency: String,

    pub status: OrderStatus,

    /// True only once a signature check has succeeded
    pub verified: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a fresh, unverified order
    pub fn new(order_id: impl Into<String>, amount: u64) -> Self {
        Self {
            order_id: order_id.into(),
            payment_id: None,
            signature: None,
            user_id: None,
            amount,
            currency: CURRENCY.to_string(),
            status: OrderStatus::Created,
            verified: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Record a verification attempt.
    ///
    /// Keeps `verified == (status == Paid)` by deriving both from one flag.
    pub(crate) fn settle(&mut self, payment_id: &str, signature: &str, authentic: bool) {
        self.payment_id = Some(payment_id.to_string());
        self.signature = Some(signature.to_string());
        self.verified = authentic;
        self.status = if authentic {
            OrderStatus::Paid
        } else {
            OrderStatus::Failed
        };
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_is_unverified() {
        let order = Order::new("order_abc", 10);
        assert_eq!(order.status, OrderStatus::Created);
        assert!(!order.verified);
        assert_eq!(order.currency, "INR");
        assert!(order.payment_id.is_none());
        assert!(order.updated_at.is_none());
    }

    #[test]
    fn test_settle_keeps_verified_in_step_with_status() {
        let mut paid = Order::new("order_1", 10);
        paid.settle("pay_1", "sig", true);
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(paid.verified);

        let mut failed = Order::new("order_2", 10);
        failed.settle("pay_2", "bad", false);
        assert_eq!(failed.status, OrderStatus::Failed);
        assert!(!failed.verified);
        assert_eq!(failed.signature.as_deref(), Some("bad"));
        assert!(failed.updated_at.is_some());
    }

    #[test]
    fn test_serializes_camel_case() {
        let order = Order::new("order_abc", 10);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderId"], "order_abc");
        assert_eq!(json["status"], "created");
        assert_eq!(json["paymentId"], serde_json::Value::Null);
    }
}
