// ============================================================================
// Trade Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use super::{OrderId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine-assigned trade identifier. Monotonic per engine, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TradeId(i64);

impl TradeId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An execution record attributed to a single order.
///
/// Each matched pair produces one trade for the resting order; the aggressor
/// gets one aggregate trade per price level it drains.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    /// Order this execution is attributed to
    pub order_id: OrderId,

    /// Trading instrument
    pub instrument: Arc<str>,

    /// Execution price (the resting level's price)
    pub trade_price: f64,

    /// Executed quantity
    pub trade_qty: f64,

    /// Side of the attributed order
    pub trade_side: Side,

    /// Unique trade identifier
    pub trade_id: TradeId,

    /// Trade timestamp
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        order_id: OrderId,
        instrument: Arc<str>,
        trade_price: f64,
        trade_qty: f64,
        trade_side: Side,
        trade_id: TradeId,
    ) -> Self {
        Self {
            order_id,
            instrument,
            trade_price,
            trade_qty,
            trade_side,
            trade_id,
            timestamp: Utc::now(),
        }
    }

    /// Notional value of the execution (price * quantity)
    pub fn notional_value(&self) -> f64 {
        self.trade_price * self.trade_qty
    }
}
