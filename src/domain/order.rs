// ============================================================================
// Order Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Engine-assigned order identifier. Monotonic per engine, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(i64);

impl OrderId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side this order trades against
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

// ============================================================================
// Order State
// ============================================================================

pub mod state {
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderState {
        /// Accepted, nothing filled yet
        New,
        PartiallyFilled,
        Filled,
        Cancelled,
    }
}

use state::OrderState;

// ============================================================================
// Order Entity
// ============================================================================

/// One order's lifecycle state.
///
/// Identity, instrument, price, original quantity and side never change after
/// construction. `cum_qty` and `leaves_qty` move together so that
/// `cum_qty + leaves_qty == qty` holds after every fill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub order_id: OrderId,
    pub instrument: Arc<str>,
    pub price: f64,
    pub qty: f64,
    pub cum_qty: f64,
    pub leaves_qty: f64,
    pub side: Side,
    pub state: OrderState,
    pub timestamp: DateTime<Utc>,
}

impl Order {
    pub fn new(order_id: OrderId, instrument: Arc<str>, price: f64, qty: f64, side: Side) -> Self {
        Self {
            order_id,
            instrument,
            price,
            qty,
            cum_qty: 0.0,
            leaves_qty: qty,
            side,
            state: OrderState::New,
            timestamp: Utc::now(),
        }
    }

    /// Apply an execution of `quantity` against this order.
    ///
    /// `min_quantity` is the threshold under which the order counts as
    /// fully filled.
    pub fn fill(&mut self, quantity: f64, min_quantity: f64) {
        self.cum_qty += quantity;
        self.leaves_qty -= quantity;

        self.state = if self.leaves_qty < min_quantity {
            OrderState::Filled
        } else {
            OrderState::PartiallyFilled
        };
    }

    /// Mark the order terminally inactive.
    pub fn cancel(&mut self) {
        self.leaves_qty = 0.0;
        self.state = OrderState::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(qty: f64) -> Order {
        Order::new(OrderId::new(1), Arc::from("BTC-USD"), 50_000.0, qty, Side::Buy)
    }

    #[test]
    fn test_order_creation() {
        let order = order(1.0);

        assert_eq!(order.leaves_qty, 1.0);
        assert_eq!(order.cum_qty, 0.0);
        assert_eq!(order.state, OrderState::New);
        assert_eq!(order.side, Side::Buy);
    }

    #[test]
    fn test_fill_conserves_quantity() {
        let mut order = order(10.0);

        order.fill(3.0, 1e-9);
        assert_eq!(order.cum_qty, 3.0);
        assert_eq!(order.leaves_qty, 7.0);
        assert_eq!(order.cum_qty + order.leaves_qty, order.qty);
        assert_eq!(order.state, OrderState::PartiallyFilled);

        order.fill(7.0, 1e-9);
        assert_eq!(order.leaves_qty, 0.0);
        assert_eq!(order.state, OrderState::Filled);
    }

    #[test]
    fn test_fill_below_minimum_counts_as_filled() {
        let mut order = order(1.0);

        order.fill(1.0 - 1e-12, 1e-9);
        assert_eq!(order.state, OrderState::Filled);
    }

    #[test]
    fn test_cancel() {
        let mut order = order(5.0);
        order.fill(2.0, 1e-9);

        assert_eq!(order.state, OrderState::PartiallyFilled);
        order.cancel();
        assert_eq!(order.leaves_qty, 0.0);
        assert_eq!(order.cum_qty, 2.0);
        assert_eq!(order.state, OrderState::Cancelled);
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::Sell.to_string(), "SELL");
    }
}
