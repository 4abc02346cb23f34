//! Order Service
//!
//! Creates orders with the provider and settles them by checking the payment
//! signature reported by the checkout widget.
//!
//! ```text
//!            signature verifies
//!   created ───────────────────▶ paid
//!      │
//!      │     signature fails
//!      └───────────────────────▶ failed
//! ```
//!
//! `paid` and `failed` are terminal. [`OrderService::verify_payment`] is the
//! only code path that can produce `paid`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PaymentError, Result, StoreError};
use crate::gateway::{NewOrder, OrderGateway, ProviderOrder};
use crate::order::{Order, OrderStatus};
use crate::signature::{self, SecretKey};
use crate::store::OrderStore;

/// Why a verification was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    InvalidSignature,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::InvalidSignature => "Invalid signature",
        }
    }
}

/// Outcome of a verification attempt. Both variants have been persisted.
#[derive(Clone, Debug)]
pub enum Verification {
    Verified(Order),
    Rejected { order: Order, reason: RejectReason },
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified(_))
    }

    pub fn order(&self) -> &Order {
        match self {
            Verification::Verified(order) | Verification::Rejected { order, .. } => order,
        }
    }
}

/// Result of order creation
#[derive(Clone, Debug)]
pub struct CreatedOrder {
    /// Persisted record
    pub order: Order,

    /// Provider order object as returned by the gateway
    pub provider: ProviderOrder,
}

/// Order lifecycle service
pub struct OrderService {
    gateway: Arc<dyn OrderGateway>,
    store: Arc<dyn OrderStore>,
    secret: SecretKey,
}

impl OrderService {
    pub fn new(gateway: Arc<dyn OrderGateway>, store: Arc<dyn OrderStore>, secret: SecretKey) -> Self {
        Self {
            gateway,
            store,
            secret,
        }
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Create a provider order for `amount` rupees and persist it as `created`.
    ///
    /// Nothing is persisted if the provider call fails.
    pub async fn create_order(&self, amount: u64) -> Result<CreatedOrder> {
        let request = NewOrder::for_amount(amount)?;

        let provider = self.gateway.create_order(&request).await.map_err(|e| {
            tracing::error!(gateway = self.gateway.name(), error = %e, "Order creation failed");
            e
        })?;

        let order = Order::new(provider.id.clone(), amount);
        self.store.create(&order)?;

        tracing::info!(
            order_id = %order.order_id,
            amount,
            receipt = %request.receipt,
            "Order created"
        );

        Ok(CreatedOrder { order, provider })
    }

    /// Check a client-reported payment and settle the order.
    ///
    /// A signature mismatch is persisted as `failed` and returned as
    /// [`Verification::Rejected`]. Terminal orders are left untouched.
    pub async fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<Verification> {
        let mut order = self
            .store
            .find_by_order_id(order_id)?
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.to_string()))?;

        if order.status.is_terminal() {
            return Err(PaymentError::AlreadySettled {
                order_id: order.order_id,
                status: order.status,
            });
        }

        let authentic = signature::verify(&self.secret, order_id, payment_id, signature);
        order.settle(payment_id, signature, authentic);

        self.store
            .update_if_status(&order, OrderStatus::Created)
            .map_err(|e| match e {
                StoreError::Conflict { order_id, actual, .. } => PaymentError::AlreadySettled {
                    order_id,
                    status: actual,
                },
                other => PaymentError::Store(other),
            })?;

        if authentic {
            tracing::info!(order_id, payment_id, "Payment verified");
            Ok(Verification::Verified(order))
        } else {
            tracing::warn!(order_id, payment_id, "Payment signature mismatch");
            Ok(Verification::Rejected {
                order,
                reason: RejectReason::InvalidSignature,
            })
        }
    }

    /// All orders, newest first
    pub fn list_orders(&self) -> Result<Vec<Order>> {
        Ok(self.store.list()?)
    }
}
