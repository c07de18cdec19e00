//! In-memory order book.

use std::collections::HashMap;
use std::sync::RwLock;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{Order, OrderStatus};

/// Tracks every order the gateway has submitted, keyed by venue order ID.
///
/// Owned by the coordinator; mutated only in response to venue
/// acknowledgements and fill reports.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: RwLock<HashMap<String, Order>>,
}

impl OrderBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new order.
    pub fn insert(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert(order.order_id.clone(), order);
        }
    }

    /// Get an order by venue ID.
    #[must_use]
    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders
            .read()
            .ok()
            .and_then(|orders| orders.get(order_id).cloned())
    }

    /// All orders, in no particular order.
    #[must_use]
    pub fn all_orders(&self) -> Vec<Order> {
        self.orders
            .read()
            .map(|orders| orders.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Orders whose status is still open.
    #[must_use]
    pub fn open_orders(&self) -> Vec<Order> {
        self.orders
            .read()
            .map(|orders| {
                orders
                    .values()
                    .filter(|o| o.status.is_open())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total order count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    /// Mark a single order cancelled.
    ///
    /// Only open orders are affected; returns the updated order, or `None`
    /// when the order is unknown or already terminal (its status is left
    /// unchanged).
    #[must_use]
    pub fn mark_cancelled(&self, order_id: &str) -> Option<Order> {
        let mut orders = self.orders.write().ok()?;
        let order = orders.get_mut(order_id)?;
        if !order.status.is_open() {
            return None;
        }
        order.status = OrderStatus::Cancelled;
        Some(order.clone())
    }

    /// Mark every open order cancelled, returning the updated orders.
    #[must_use]
    pub fn mark_cancelled_open(&self) -> Vec<Order> {
        let Ok(mut orders) = self.orders.write() else {
            return Vec::new();
        };
        orders
            .values_mut()
            .filter(|o| o.status.is_open())
            .map(|o| {
                o.status = OrderStatus::Cancelled;
                o.clone()
            })
            .collect()
    }

    /// Apply a fill report to an order.
    ///
    /// Updates filled quantity (clamped so it never exceeds the order
    /// quantity), the volume-weighted average fill price, and the status.
    /// Fills against unknown or terminal orders are ignored.
    #[must_use]
    pub fn apply_fill(&self, order_id: &str, fill_quantity: u32, fill_price: Decimal) -> Option<Order> {
        let mut orders = self.orders.write().ok()?;
        let Some(order) = orders.get_mut(order_id) else {
            warn!(order_id, "Fill report for unknown order, ignoring");
            return None;
        };
        if order.status.is_terminal() {
            warn!(
                order_id,
                status = ?order.status,
                "Fill report for terminal order, ignoring"
            );
            return None;
        }

        let accepted = fill_quantity.min(order.remaining_quantity());
        if accepted < fill_quantity {
            warn!(
                order_id,
                reported = fill_quantity,
                accepted,
                "Fill exceeds remaining quantity, clamping"
            );
        }
        if accepted == 0 {
            return Some(order.clone());
        }

        let prior_cost = order.filled_avg_price * Decimal::from(order.filled_quantity);
        let fill_cost = fill_price * Decimal::from(accepted);
        order.filled_quantity += accepted;
        order.filled_avg_price = (prior_cost + fill_cost) / Decimal::from(order.filled_quantity);

        order.status = if order.filled_quantity == order.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };

        Some(order.clone())
    }
}
