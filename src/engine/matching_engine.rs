// ============================================================================
// Matching Engine
// Core business logic for order matching
// ============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    EngineConfig, Order, OrderBook, OrderBookSnapshot, OrderId, OrderState, Side, Trade,
};
use crate::engine::price_time;
use crate::error::{MatchingError, MatchingResult};
use crate::interfaces::{EventHandler, NoOpEventHandler, OrderEvent};

/// Price/time priority matching engine over any number of instruments.
///
/// Each instrument gets its own [`OrderBook`], created on the first order
/// for it. Order and trade ids are engine-local and start at 1, so two
/// engines never share sequence state.
pub struct MatchingEngine {
    /// Tick and quantity parameters for newly created books
    config: EngineConfig,

    /// Order books keyed by instrument
    order_books: HashMap<String, OrderBook>,

    /// Last assigned order id
    curr_order_id: i64,

    /// Last assigned trade id
    curr_trade_id: i64,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    /// Create an engine with the default tick size and minimum quantity
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            order_books: HashMap::new(),
            curr_order_id: 0,
            curr_trade_id: 0,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Create an engine from a validated configuration
    pub fn with_config(config: EngineConfig) -> MatchingResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replace the event handler
    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    // ========================================================================
    // Order Entry
    // ========================================================================

    /// Submit a limit order, matching it against the opposite side first.
    ///
    /// Returns the order as it stands once matching is done together with
    /// the trades generated, in emission order. Any remainder above the
    /// minimum quantity rests on the book; its live record is available
    /// through [`MatchingEngine::get_order`].
    ///
    /// # Errors
    /// Returns `InvalidOrder` for an empty instrument, a non-finite or
    /// non-positive quantity, or a price that cannot be mapped to a tick.
    /// A rejected request consumes no order id and leaves every book as it
    /// was.
    pub fn add_order(
        &mut self,
        instrument: &str,
        price: f64,
        qty: f64,
        side: Side,
    ) -> MatchingResult<(Order, Vec<Trade>)> {
        if let Err(err) = self.validate_order(instrument, price, qty) {
            tracing::warn!(instrument, price, qty, %side, error = %err, "order rejected");
            self.event_handler.on_event(OrderEvent::OrderRejected {
                instrument: instrument.to_string(),
                reason: err.to_string(),
                timestamp: Utc::now(),
            });
            return Err(err);
        }

        let book = match self.order_books.entry(instrument.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (normalizer, min_quantity) = self.config.book_params(instrument)?;
                tracing::debug!(
                    instrument,
                    tick_size = normalizer.tick_size(),
                    min_quantity,
                    "order book created"
                );
                entry.insert(OrderBook::new(Arc::from(instrument), normalizer, min_quantity))
            }
        };

        self.curr_order_id += 1;
        let mut order = Order::new(
            OrderId::new(self.curr_order_id),
            Arc::clone(&book.instrument),
            price,
            qty,
            side,
        );

        let mut events = vec![OrderEvent::OrderAccepted {
            order_id: order.order_id,
            instrument: Arc::clone(&order.instrument),
            side,
            price,
            quantity: qty,
            timestamp: Utc::now(),
        }];

        let outcome = price_time::match_order(book, &mut order, &mut self.curr_trade_id);
        let min_quantity = book.min_quantity;

        events.extend(outcome.trades.iter().map(|trade| OrderEvent::OrderMatched {
            trade: trade.clone(),
            timestamp: Utc::now(),
        }));
        events.extend(outcome.filled.iter().map(|resting| OrderEvent::OrderFilled {
            order_id: resting.order_id,
            total_filled: resting.cum_qty,
            timestamp: Utc::now(),
        }));

        match order.state {
            OrderState::Filled => events.push(OrderEvent::OrderFilled {
                order_id: order.order_id,
                total_filled: order.cum_qty,
                timestamp: Utc::now(),
            }),
            OrderState::PartiallyFilled => events.push(OrderEvent::OrderPartiallyFilled {
                order_id: order.order_id,
                filled_quantity: order.cum_qty,
                remaining_quantity: order.leaves_qty,
                timestamp: Utc::now(),
            }),
            _ => {}
        }

        if order.leaves_qty > min_quantity {
            book.insert_resting(order.clone());
            events.push(OrderEvent::OrderAddedToBook {
                order_id: order.order_id,
                price,
                quantity: order.leaves_qty,
                timestamp: Utc::now(),
            });
        }

        tracing::debug!(
            instrument,
            order_id = %order.order_id,
            %side,
            price,
            qty,
            leaves = order.leaves_qty,
            trades = outcome.trades.len(),
            "order processed"
        );

        self.event_handler.on_events(events);

        Ok((order, outcome.trades))
    }

    /// Cancel a resting order and hand its record back to the caller.
    ///
    /// The returned record has `leaves_qty` forced to 0 and keeps its
    /// `cum_qty`.
    ///
    /// # Errors
    /// Returns `InstrumentNotFound` if no book exists for the instrument and
    /// `OrderNotFound` if the id is not resting in it. A failed call leaves
    /// the book unmodified.
    pub fn cancel_order(&mut self, order_id: OrderId, instrument: &str) -> MatchingResult<Order> {
        let book = self
            .order_books
            .get_mut(instrument)
            .ok_or_else(|| MatchingError::InstrumentNotFound(instrument.to_string()))?;

        let mut order = book.remove(order_id)?;
        let cancelled_quantity = order.leaves_qty;
        order.cancel();

        tracing::debug!(instrument, %order_id, cancelled_quantity, "order cancelled");
        self.event_handler.on_event(OrderEvent::OrderCancelled {
            order_id,
            cancelled_quantity,
            timestamp: Utc::now(),
        });

        Ok(order)
    }

    fn validate_order(&self, instrument: &str, price: f64, qty: f64) -> MatchingResult<()> {
        if instrument.is_empty() {
            return Err(MatchingError::InvalidOrder(
                "instrument cannot be empty".to_string(),
            ));
        }

        if !qty.is_finite() || qty <= 0.0 {
            return Err(MatchingError::InvalidOrder(format!(
                "quantity must be finite and positive, got {qty}"
            )));
        }

        let normalizer = match self.order_books.get(instrument) {
            Some(book) => *book.normalizer(),
            None => self.config.book_params(instrument)?.0,
        };
        normalizer
            .try_normalize(price)
            .map_err(|err| MatchingError::InvalidOrder(err.to_string()))?;

        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// All order books, keyed by instrument
    pub fn order_books(&self) -> &HashMap<String, OrderBook> {
        &self.order_books
    }

    pub fn order_book(&self, instrument: &str) -> Option<&OrderBook> {
        self.order_books.get(instrument)
    }

    /// Last assigned order id (0 before the first order)
    pub fn curr_order_id(&self) -> i64 {
        self.curr_order_id
    }

    /// Last assigned trade id (0 before the first trade)
    pub fn curr_trade_id(&self) -> i64 {
        self.curr_trade_id
    }

    /// Live record of a resting order
    pub fn get_order(&self, instrument: &str, order_id: OrderId) -> Option<&Order> {
        self.order_books
            .get(instrument)
            .and_then(|book| book.get_order(order_id))
    }

    /// Resting orders at one price level, front first
    pub fn queue_at(&self, instrument: &str, side: Side, price: f64) -> MatchingResult<Vec<&Order>> {
        self.book(instrument)?.queue_at(side, price)
    }

    /// Aggregated depth of one instrument's book
    pub fn snapshot(&self, instrument: &str, depth: usize) -> MatchingResult<OrderBookSnapshot> {
        Ok(self.book(instrument)?.snapshot(depth))
    }

    fn book(&self, instrument: &str) -> MatchingResult<&OrderBook> {
        self.order_books
            .get(instrument)
            .ok_or_else(|| MatchingError::InstrumentNotFound(instrument.to_string()))
    }
}
