//! Order service trait, order records and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use cart::{LineItem, Money, ProductId};
use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Status recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Paid and settled.
    #[default]
    Completed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A purchased line as recorded on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Payload for creating an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    /// Grand total including tax.
    pub total: Money,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// An order as stored by the backend. Never modified by the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds the stored order from a creation payload.
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            user_id: new.user_id,
            items: new.items,
            total: new.total,
            status: new.status,
            created_at: new.created_at,
        }
    }

    /// Returns the number of units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Backend owning order records.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Creates an order and returns it with its assigned id.
    async fn create_order(&self, order: NewOrder) -> Result<Order, ServiceError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: Vec<Order>,
    fail_on_create: bool,
}

/// In-memory order service for tests and the command-line shell.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderService {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderService {
    /// Creates a new in-memory order service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures subsequent create calls to fail.
    pub fn set_fail_on_create(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_create = fail;
        }
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.state.read().map(|s| s.orders.len()).unwrap_or(0)
    }

    /// Returns all stored orders in creation order.
    pub fn orders(&self) -> Vec<Order> {
        self.state
            .read()
            .map(|s| s.orders.clone())
            .unwrap_or_default()
    }

    /// Returns the orders placed by a user.
    pub fn orders_for(&self, user_id: &UserId) -> Vec<Order> {
        self.orders()
            .into_iter()
            .filter(|order| &order.user_id == user_id)
            .collect()
    }
}

#[async_trait]
impl OrderService for InMemoryOrderService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, ServiceError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| ServiceError::Unavailable("order store lock poisoned".to_string()))?;

        if state.fail_on_create {
            return Err(ServiceError::Unavailable("order backend down".to_string()));
        }

        let order = Order::from_new(OrderId::new(), order);
        state.orders.push(order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(user: &str) -> NewOrder {
        NewOrder {
            user_id: UserId::new(user),
            items: vec![OrderLine {
                product_id: "p1".into(),
                name: "Print".to_string(),
                unit_price: Money::from_major(10),
                quantity: 2,
            }],
            total: Money::from_cents(2420),
            status: OrderStatus::Completed,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_order_assigns_id() {
        let service = InMemoryOrderService::new();
        let order = service.create_order(new_order("u1")).await.unwrap();

        assert_eq!(order.unit_count(), 2);
        assert_eq!(service.order_count(), 1);
        assert_eq!(service.orders()[0].id, order.id);
    }

    #[tokio::test]
    async fn test_fail_on_create() {
        let service = InMemoryOrderService::new();
        service.set_fail_on_create(true);

        assert!(service.create_order(new_order("u1")).await.is_err());
        assert_eq!(service.order_count(), 0);
    }

    #[tokio::test]
    async fn test_orders_for_user() {
        let service = InMemoryOrderService::new();
        service.create_order(new_order("u1")).await.unwrap();
        service.create_order(new_order("u2")).await.unwrap();
        service.create_order(new_order("u1")).await.unwrap();

        assert_eq!(service.orders_for(&UserId::new("u1")).len(), 2);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
