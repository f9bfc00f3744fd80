// ============================================================================
// Event Handler Interface
// Defines the contract for handling order and trade events
// ============================================================================

use crate::domain::{OrderId, Side, Trade};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the matching engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderEvent {
    /// Order validated and assigned an id
    OrderAccepted {
        order_id: OrderId,
        instrument: Arc<str>,
        side: Side,
        price: f64,
        quantity: f64,
        timestamp: DateTime<Utc>,
    },

    /// Order request rejected with reason; no id was assigned
    OrderRejected {
        instrument: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Execution generated
    OrderMatched {
        trade: Trade,
        timestamp: DateTime<Utc>,
    },

    /// Incoming order partially filled
    OrderPartiallyFilled {
        order_id: OrderId,
        filled_quantity: f64,
        remaining_quantity: f64,
        timestamp: DateTime<Utc>,
    },

    /// Order fully filled (incoming or resting)
    OrderFilled {
        order_id: OrderId,
        total_filled: f64,
        timestamp: DateTime<Utc>,
    },

    /// Remainder rested on the book
    OrderAddedToBook {
        order_id: OrderId,
        price: f64,
        quantity: f64,
        timestamp: DateTime<Utc>,
    },

    /// Resting order cancelled
    OrderCancelled {
        order_id: OrderId,
        cancelled_quantity: f64,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing matching engine events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an order event
    fn on_event(&self, event: OrderEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler, the engine default
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        tracing::debug!("Matching engine event: {:?}", event);
    }
}
