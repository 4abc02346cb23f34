//! # lumina-core
//!
//! Shared contract and client-side gating logic for LuminaTemp.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Thermostat                             │
//! │  ┌──────────────┐   guard_action   ┌──────────────────────┐  │
//! │  │ temp / mode  │─────────────────▶│    SessionClock      │  │
//! │  └──────────────┘       tick       │ (trial | premium)    │  │
//! │                                    └──────────▲───────────┘  │
//! └───────────────────────────────────────────────┼─────────────┘
//!                                  SessionHook     │
//! ┌────────────────────────────────────────────────┴────────────┐
//! │  PaymentFlow: CheckoutWidget ── PaymentBackend ── Timer      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches the browser or the network directly: the widget,
//! backend and timer are traits, implemented by the web crate and by tests.

pub mod checkout;
pub mod error;
pub mod pricing;
pub mod session;
pub mod thermostat;
pub mod wire;

pub use checkout::{
    CheckoutOptions, CheckoutOutcome, CheckoutWidget, FlowOutcome, FlowPhase, PaymentBackend,
    PaymentFlow, PaymentReceipt, SessionHook, Timer,
};
pub use error::{AccessDenied, FlowError, Result};
pub use session::{SessionClock, SessionPolicy, TickOutcome, UserSession};
pub use thermostat::{Action, Mode, Thermostat};
pub use wire::{
    CheckoutConfig, CreateOrderRequest, ErrorBody, OrderSummary, VerifyPaymentRequest,
    VerifyPaymentResponse,
};
