//! # lumina-payments
//!
//! Order lifecycle and payment verification for LuminaTemp premium access.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐ create_order   ┌──────────────┐ POST /orders ┌──────────┐
//! │  Client  │───────────────▶│ OrderService │─────────────▶│ Razorpay │
//! │ (widget) │                │              │◀─────────────│          │
//! │          │ verify_payment │  HMAC-SHA256 │   order id   └──────────┘
//! │          │───────────────▶│  + CAS write │──▶ OrderStore
//! └──────────┘                └──────────────┘
//! ```
//!
//! The checkout widget hands the client `(payment_id, signature)`. Only the
//! server knows the key secret, so only [`OrderService::verify_payment`] can
//! decide whether that pair is authentic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumina_payments::{MemoryOrderStore, OrderService, RazorpayClient};
//!
//! let client = RazorpayClient::from_env()?;
//! let secret = client.config().key_secret.clone();
//! let service = OrderService::new(Arc::new(client), Arc::new(MemoryOrderStore::new()), secret);
//!
//! let created = service.create_order(10).await?;
//! // ...widget callback delivers payment_id + signature...
//! let verdict = service.verify_payment(&created.order.order_id, &payment_id, &signature).await?;
//! ```

pub mod gateway;
pub mod signature;
mod error;
mod order;
mod service;
mod store;

pub use error::{PaymentError, Result, StoreError};
pub use gateway::{MockOrderGateway, NewOrder, OrderGateway, ProviderOrder, RazorpayClient, RazorpayConfig};
pub use order::{CURRENCY, Order, OrderStatus};
pub use service::{CreatedOrder, OrderService, RejectReason, Verification};
pub use signature::SecretKey;
pub use store::{MemoryOrderStore, OrderStore, StoreResult};
