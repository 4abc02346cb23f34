//! Mock Order Gateway
//!
//! For testing and local demos. Mints provider-shaped orders without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{NewOrder, OrderGateway, ProviderOrder};
use crate::error::{PaymentError, Result};

/// Mock gateway with scripted ids and failure injection
#[derive(Default)]
pub struct MockOrderGateway {
    scripted_ids: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<NewOrder>>,
    fail_with: Option<String>,
}

impl MockOrderGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out these ids first, then fall back to generated ones
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scripted_ids: Mutex::new(ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Every call fails as the provider would on auth/network errors
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<NewOrder> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next_id(&self) -> String {
        self.scripted_ids
            .lock()
            .ok()
            .and_then(|mut ids| ids.pop_front())
            .unwrap_or_else(|| {
                let id = uuid::Uuid::new_v4().simple().to_string();
                format!("order_{}", &id[..14])
            })
    }
}

#[async_trait]
impl OrderGateway for MockOrderGateway {
    async fn create_order(&self, request: &NewOrder) -> Result<ProviderOrder> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(reason) = &self.fail_with {
            return Err(PaymentError::UpstreamOrder(reason.clone()));
        }

        Ok(ProviderOrder {
            id: self.next_id(),
            entity: "order".into(),
            amount: request.amount,
            amount_paid: 0,
            amount_due: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: "created".into(),
            attempts: 0,
            notes: serde_json::Value::Array(Vec::new()),
            created_at: Utc::now().timestamp(),
            extra: serde_json::Map::new(),
        })
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_ids_then_generated() {
        let gateway = MockOrderGateway::with_ids(["order_abc"]);
        let request = NewOrder::for_amount(10).unwrap();

        let first = gateway.create_order(&request).await.unwrap();
        let second = gateway.create_order(&request).await.unwrap();

        assert_eq!(first.id, "order_abc");
        assert!(second.id.starts_with("order_"));
        assert_ne!(first.id, second.id);
        assert_eq!(gateway.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_gateway() {
        let gateway = MockOrderGateway::failing("auth failed");
        let request = NewOrder::for_amount(10).unwrap();

        let err = gateway.create_order(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::UpstreamOrder(_)));
    }
}
