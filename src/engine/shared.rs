// ============================================================================
// Shared Matching Engine
// Thread-safe handle around a single-writer engine
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Order, OrderId, Side, Trade};
use crate::engine::MatchingEngine;
use crate::error::MatchingResult;

/// Cloneable handle for sharing one engine across threads.
///
/// Each call holds the lock for its whole duration, so operations are
/// applied one at a time in lock acquisition order.
#[derive(Clone)]
pub struct SharedMatchingEngine {
    inner: Arc<Mutex<MatchingEngine>>,
}

impl SharedMatchingEngine {
    pub fn new(engine: MatchingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn add_order(
        &self,
        instrument: &str,
        price: f64,
        qty: f64,
        side: Side,
    ) -> MatchingResult<(Order, Vec<Trade>)> {
        self.inner.lock().add_order(instrument, price, qty, side)
    }

    pub fn cancel_order(&self, order_id: OrderId, instrument: &str) -> MatchingResult<Order> {
        self.inner.lock().cancel_order(order_id, instrument)
    }

    /// Run a read-only closure against the engine
    pub fn read<R>(&self, f: impl FnOnce(&MatchingEngine) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Run a closure with exclusive access to the engine
    pub fn write<R>(&self, f: impl FnOnce(&mut MatchingEngine) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl From<MatchingEngine> for SharedMatchingEngine {
    fn from(engine: MatchingEngine) -> Self {
        Self::new(engine)
    }
}
