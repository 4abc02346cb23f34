//! Payment Flow
//!
//! Drives the premium purchase from the client side:
//!
//! ```text
//!  details ──trigger──▶ processing ──verified──▶ success
//!     ▲                     │
//!     └──── load error, backend error, dismissal, timeout, rejection
//! ```
//!
//! The checkout widget is third-party code. Its callback is the only point
//! where the flow resumes, so the handshake is raced against a timer and a
//! silent widget cannot leave the flow stuck in `processing`. A timed-out
//! widget is closed before the flow returns.

use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{Either, LocalBoxFuture, select};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::error::{FlowError, Result};
use crate::pricing;
use crate::wire::{CheckoutConfig, OrderSummary, VerifyPaymentRequest, VerifyPaymentResponse};

/// Modal step shown to the user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowPhase {
    #[default]
    Details,
    Processing,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTheme {
    pub color: String,
}

/// Options passed to the widget constructor; `handler` is attached by the widget binding
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub key: String,
    /// Paise
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: String,
    pub theme: CheckoutTheme,
}

impl CheckoutOptions {
    pub fn new(config: &CheckoutConfig, order: &OrderSummary) -> Self {
        Self {
            key: config.key.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            order_id: order.id.clone(),
            theme: CheckoutTheme {
                color: config.theme_color.clone(),
            },
        }
    }
}

/// Argument of the widget's success handler. Field names are fixed by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(rename = "razorpay_signature")]
    pub signature: String,
    #[serde(rename = "razorpay_order_id", default)]
    pub order_id: Option<String>,
}

/// How the widget handshake resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Paid(PaymentReceipt),
    Dismissed,
}

/// How a completed run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Server accepted the signature; premium window granted
    Granted { order_id: String },

    /// Verification failed; trial re-armed
    Rejected { order_id: String, reason: String },

    /// User closed the widget
    Cancelled { order_id: String },
}

/// Third-party checkout widget
#[async_trait(?Send)]
pub trait CheckoutWidget {
    /// Inject and load the widget script
    async fn load_script(&self, src: &str) -> Result<()>;

    /// Open the widget and wait for its callback or dismissal
    async fn open(&self, options: CheckoutOptions) -> Result<CheckoutOutcome>;

    /// Tear down an open widget so it can no longer take a payment
    fn close(&self);
}

/// Server endpoints used by the flow
#[async_trait(?Send)]
pub trait PaymentBackend {
    async fn checkout_config(&self) -> Result<CheckoutConfig>;

    async fn create_order(&self, amount: u64) -> Result<OrderSummary>;

    /// `Ok` for both verdicts; `Err` only for transport or server faults
    async fn verify_payment(&self, request: &VerifyPaymentRequest) -> Result<VerifyPaymentResponse>;
}

/// Source of delays for the handshake timeout
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Receives session transitions and phase changes
pub trait SessionHook {
    fn premium_granted(&self);

    fn trial_rearmed(&self);

    fn phase_changed(&self, _phase: FlowPhase) {}
}

/// Client-side payment flow controller
pub struct PaymentFlow<W, B, T> {
    widget: W,
    backend: B,
    timer: T,
    script_url: String,
    callback_timeout: Duration,
    script: OnceCell<()>,
    config: OnceCell<CheckoutConfig>,
    phase: Cell<FlowPhase>,
    running: Cell<bool>,
}

impl<W, B, T> PaymentFlow<W, B, T>
where
    W: CheckoutWidget,
    B: PaymentBackend,
    T: Timer,
{
    pub fn new(widget: W, backend: B, timer: T) -> Self {
        Self {
            widget,
            backend,
            timer,
            script_url: pricing::CHECKOUT_SCRIPT_URL.into(),
            callback_timeout: Duration::from_secs(pricing::CHECKOUT_CALLBACK_TIMEOUT_SECS),
            script: OnceCell::new(),
            config: OnceCell::new(),
            phase: Cell::new(FlowPhase::Details),
            running: Cell::new(false),
        }
    }

    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }

    pub fn with_script_url(mut self, url: impl Into<String>) -> Self {
        self.script_url = url.into();
        self
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase.get()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one purchase attempt.
    ///
    /// Errors leave the flow in `details` so the user can trigger it again.
    pub async fn run(&self, hook: &dyn SessionHook) -> Result<FlowOutcome> {
        if self.running.replace(true) {
            return Err(FlowError::InProgress);
        }

        let result = self.drive(hook).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Payment flow aborted");
            self.set_phase(FlowPhase::Details, hook);
        }
        self.running.set(false);

        result
    }

    async fn drive(&self, hook: &dyn SessionHook) -> Result<FlowOutcome> {
        self.set_phase(FlowPhase::Processing, hook);

        // At most one injection, even across overlapping triggers
        self.script
            .get_or_try_init(|| self.widget.load_script(&self.script_url))
            .await?;

        let config = self
            .config
            .get_or_try_init(|| self.backend.checkout_config())
            .await?;

        let order = self.backend.create_order(config.amount).await?;
        tracing::info!(order_id = %order.id, amount = order.amount, "Opening checkout");

        let options = CheckoutOptions::new(config, &order);
        let handshake = select(
            self.widget.open(options),
            self.timer.sleep(self.callback_timeout),
        );

        let receipt = match handshake.await {
            Either::Left((Ok(CheckoutOutcome::Paid(receipt)), _)) => receipt,
            Either::Left((Ok(CheckoutOutcome::Dismissed), _)) => {
                self.set_phase(FlowPhase::Details, hook);
                return Ok(FlowOutcome::Cancelled { order_id: order.id });
            }
            Either::Left((Err(e), _)) => return Err(e),
            Either::Right(((), pending)) => {
                drop(pending);
                self.widget.close();
                tracing::warn!(order_id = %order.id, "Checkout closed after timeout");
                return Err(FlowError::CallbackTimeout(self.callback_timeout));
            }
        };

        let request = VerifyPaymentRequest {
            order_id: order.id.clone(),
            payment_id: receipt.payment_id,
            signature: receipt.signature,
        };

        let verdict = self.backend.verify_payment(&request).await;
        match verdict {
            Ok(response) if response.success => {
                self.set_phase(FlowPhase::Success, hook);
                hook.premium_granted();
                Ok(FlowOutcome::Granted { order_id: order.id })
            }
            Ok(response) => {
                self.reject(hook);
                Ok(FlowOutcome::Rejected {
                    order_id: order.id,
                    reason: response.message,
                })
            }
            Err(e) => {
                self.reject(hook);
                Ok(FlowOutcome::Rejected {
                    order_id: order.id,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn reject(&self, hook: &dyn SessionHook) {
        self.set_phase(FlowPhase::Details, hook);
        hook.trial_rearmed();
    }

    fn set_phase(&self, phase: FlowPhase, hook: &dyn SessionHook) {
        if self.phase.replace(phase) != phase {
            hook.phase_changed(phase);
        }
    }

    /// Back to `details` once the success screen has been shown
    pub fn reset(&self, hook: &dyn SessionHook) {
        if !self.running.get() {
            self.set_phase(FlowPhase::Details, hook);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_uses_provider_field_names() {
        let receipt: PaymentReceipt = serde_json::from_str(
            r#"{"razorpay_payment_id":"pay_1","razorpay_order_id":"order_abc","razorpay_signature":"ab12"}"#,
        )
        .unwrap();
        assert_eq!(receipt.payment_id, "pay_1");
        assert_eq!(receipt.signature, "ab12");
        assert_eq!(receipt.order_id.as_deref(), Some("order_abc"));
    }

    #[test]
    fn test_options_take_amount_from_order() {
        let config = CheckoutConfig::premium("rzp_test_key");
        let order = OrderSummary {
            id: "order_abc".into(),
            amount: 1000,
            currency: "INR".into(),
        };

        let options = CheckoutOptions::new(&config, &order);
        let json = serde_json::to_value(&options).unwrap();

        assert_eq!(json["order_id"], "order_abc");
        assert_eq!(json["amount"], 1000);
        assert_eq!(json["key"], "rzp_test_key");
        assert_eq!(json["theme"]["color"], "#4f46e5");
    }
}
