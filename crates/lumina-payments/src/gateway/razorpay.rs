//! Razorpay Orders API client

use async_trait::async_trait;
use serde::Deserialize;

use super::{NewOrder, OrderGateway, ProviderOrder};
use crate::error::{PaymentError, Result};
use crate::signature::SecretKey;

const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

/// Razorpay credentials and endpoint
#[derive(Clone, Debug)]
pub struct RazorpayConfig {
    /// Public key id, safe to hand to the checkout widget
    pub key_id: String,

    /// API secret, also the payment-signature secret
    pub key_secret: SecretKey,

    /// API base URL
    pub api_base: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretKey::new(key_secret),
            api_base: DEFAULT_API_BASE.into(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let key_id = std::env::var("RAZORPAY_KEY_ID")
            .map_err(|_| PaymentError::Config("RAZORPAY_KEY_ID not set".into()))?;
        let key_secret = std::env::var("RAZORPAY_KEY_SECRET")
            .map_err(|_| PaymentError::Config("RAZORPAY_KEY_SECRET not set".into()))?;

        let mut config = Self::new(key_id, key_secret);
        if let Ok(base) = std::env::var("RAZORPAY_API_BASE") {
            config.api_base = base;
        }

        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// Razorpay client wrapper
pub struct RazorpayClient {
    http: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(RazorpayConfig::from_env()?))
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl OrderGateway for RazorpayClient {
    async fn create_order(&self, request: &NewOrder) -> Result<ProviderOrder> {
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose()))
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::UpstreamOrder(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| format!("{}: {}", b.error.code, b.error.description))
                .unwrap_or(body);
            return Err(PaymentError::UpstreamOrder(format!("{status}: {detail}")));
        }

        response
            .json::<ProviderOrder>()
            .await
            .map_err(|e| PaymentError::UpstreamOrder(e.to_string()))
    }

    fn name(&self) -> &str {
        "Razorpay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RazorpayConfig::new("rzp_test_key", "secret");
        assert_eq!(config.api_base, "https://api.razorpay.com/v1");
        assert_eq!(config.key_id, "rzp_test_key");
    }

    #[test]
    fn test_orders_url_ignores_trailing_slash() {
        let mut config = RazorpayConfig::new("k", "s");
        config.api_base = "http://localhost:9000/v1/".into();
        let client = RazorpayClient::new(config);
        assert_eq!(client.orders_url(), "http://localhost:9000/v1/orders");
    }

    #[test]
    fn test_api_error_body_parses() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"Authentication failed"}}"#,
        )
        .unwrap();
        assert_eq!(body.error.code, "BAD_REQUEST_ERROR");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_upstream_error() {
        let mut config = RazorpayConfig::new("k", "s");
        config.api_base = "http://127.0.0.1:9".into();
        let client = RazorpayClient::new(config);

        let request = NewOrder::for_amount(10).unwrap();
        let err = client.create_order(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::UpstreamOrder(_)));
    }
}
