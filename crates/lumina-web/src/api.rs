//! API Client

use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use lumina_core::{
    CheckoutConfig, CreateOrderRequest, ErrorBody, FlowError, OrderSummary, PaymentBackend,
    VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Talks to the LuminaTemp server on the page's own origin
pub struct HttpBackend {
    client: reqwest::Client,
    origin: String,
}

impl HttpBackend {
    pub fn from_window() -> Self {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost:5000".into());

        Self {
            client: reqwest::Client::new(),
            origin,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

fn transport(e: reqwest::Error) -> FlowError {
    FlowError::Backend(e.to_string())
}

/// Turn a non-2xx reply into a backend error carrying the server's message
async fn failure(response: Response) -> FlowError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| "Request failed".into());

    FlowError::Backend(format!("{status}: {message}"))
}

#[async_trait(?Send)]
impl PaymentBackend for HttpBackend {
    async fn checkout_config(&self) -> lumina_core::Result<CheckoutConfig> {
        let response = self
            .client
            .get(self.url("/api/checkout/config"))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn create_order(&self, amount: u64) -> lumina_core::Result<OrderSummary> {
        let response = self
            .client
            .post(self.url("/api/create-order"))
            .json(&CreateOrderRequest { amount })
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        response.json().await.map_err(transport)
    }

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> lumina_core::Result<VerifyPaymentResponse> {
        let response = self
            .client
            .post(self.url("/api/verify-payment"))
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        // Both verdicts carry the same body
        match response.status() {
            StatusCode::OK | StatusCode::BAD_REQUEST => response.json().await.map_err(transport),
            _ => Err(failure(response).await),
        }
    }
}
