//! Order Storage
//!
//! Append/update-only persistence for orders. There is no delete.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::order::{Order, OrderStatus};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Order storage trait
pub trait OrderStore: Send + Sync {
    /// Insert a new order; fails with `DuplicateKey` if the id exists
    fn create(&self, order: &Order) -> StoreResult<()>;

    /// Get order by provider order id
    fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Order>>;

    /// Overwrite an existing order; fails with `NotFound` if absent
    fn update(&self, order: &Order) -> StoreResult<()>;

    /// Write `order` only if the stored status still equals `expected`.
    ///
    /// Atomic with respect to other writers of the same id.
    fn update_if_status(&self, order: &Order, expected: OrderStatus) -> StoreResult<()>;

    /// All orders, newest first
    fn list(&self) -> StoreResult<Vec<Order>>;
}

/// In-memory order store
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for MemoryOrderStore {
    fn create(&self, order: &Order) -> StoreResult<()> {
        let mut orders = self.orders.write().map_err(|_| StoreError::Poisoned)?;

        if orders.contains_key(&order.order_id) {
            return Err(StoreError::DuplicateKey(order.order_id.clone()));
        }
        orders.insert(order.order_id.clone(), order.clone());

        Ok(())
    }

    fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let orders = self.orders.read().map_err(|_| StoreError::Poisoned)?;
        Ok(orders.get(order_id).cloned())
    }

    fn update(&self, order: &Order) -> StoreResult<()> {
        let mut orders = self.orders.write().map_err(|_| StoreError::Poisoned)?;

        match orders.get_mut(&order.order_id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(order.order_id.clone())),
        }
    }

    fn update_if_status(&self, order: &Order, expected: OrderStatus) -> StoreResult<()> {
        let mut orders = self.orders.write().map_err(|_| StoreError::Poisoned)?;

        let existing = orders
            .get_mut(&order.order_id)
            .ok_or_else(|| StoreError::NotFound(order.order_id.clone()))?;

        if existing.status != expected {
            return Err(StoreError::Conflict {
                order_id: order.order_id.clone(),
                expected,
                actual: existing.status,
            });
        }
        *existing = order.clone();

        Ok(())
    }

    fn list(&self) -> StoreResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| StoreError::Poisoned)?;
        let mut result: Vec<_> = orders.values().cloned().collect();

        // Sort by created_at descending
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_create_rejects_duplicate_id() {
        let store = MemoryOrderStore::new();
        let order = Order::new("order_abc", 10);

        store.create(&order).unwrap();
        let err = store.create(&order).unwrap_err();

        assert_eq!(err, StoreError::DuplicateKey("order_abc".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_requires_existing_order() {
        let store = MemoryOrderStore::new();
        let order = Order::new("order_missing", 10);

        assert_eq!(
            store.update(&order).unwrap_err(),
            StoreError::NotFound("order_missing".into())
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_overwrites_mutable_fields() {
        let store = MemoryOrderStore::new();
        let mut order = Order::new("order_abc", 10);
        store.create(&order).unwrap();

        order.settle("pay_1", "sig", true);
        store.update(&order).unwrap();

        let loaded = store.find_by_order_id("order_abc").unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
        assert_eq!(loaded.payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn test_update_if_status_refuses_to_overwrite_paid() {
        let store = MemoryOrderStore::new();
        let order = Order::new("order_abc", 10);
        store.create(&order).unwrap();

        let mut paid = order.clone();
        paid.settle("pay_1", "good", true);
        store.update_if_status(&paid, OrderStatus::Created).unwrap();

        let mut stale = order;
        stale.settle("pay_1", "bad", false);
        let err = store.update_if_status(&stale, OrderStatus::Created).unwrap_err();

        assert!(matches!(err, StoreError::Conflict { actual: OrderStatus::Paid, .. }));
        let loaded = store.find_by_order_id("order_abc").unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
    }

    #[test]
    fn test_list_newest_first() {
        let store = MemoryOrderStore::new();
        let mut older = Order::new("order_old", 10);
        older.created_at -= Duration::minutes(5);
        let newer = Order::new("order_new", 10);

        store.create(&older).unwrap();
        store.create(&newer).unwrap();

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec!["order_new", "order_old"]);
    }
}
