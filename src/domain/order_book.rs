// ============================================================================
// Order Book Domain Model
// ============================================================================

use slab::Slab;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::price_level::{OrderKey, PriceLevel};
use super::{Order, OrderId, Side};
use crate::error::{MatchingError, MatchingResult};
use crate::numeric::{PriceNormalizer, Tick, NO_ASK, NO_BID};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Book
// ============================================================================

/// Per-instrument book: two tick-ordered sides of FIFO levels plus an id index.
///
/// The book owns every resting order record in an arena. Price levels and the
/// id index hold arena handles, so a fill applied through one path is visible
/// through the other, and removing an order means dropping both handles and
/// releasing its slot.
#[derive(Debug)]
pub struct OrderBook {
    pub(crate) instrument: Arc<str>,
    pub(crate) normalizer: PriceNormalizer,
    pub(crate) min_quantity: f64,

    /// Tick -> level; best bid is the highest key
    pub(crate) bids: BTreeMap<Tick, PriceLevel>,

    /// Tick -> level; best ask is the lowest key
    pub(crate) asks: BTreeMap<Tick, PriceLevel>,

    /// Arena of resting order records
    pub(crate) orders: Slab<Order>,

    /// Order id -> arena handle
    pub(crate) order_id_map: HashMap<OrderId, OrderKey>,
}

impl OrderBook {
    pub fn new(instrument: Arc<str>, normalizer: PriceNormalizer, min_quantity: f64) -> Self {
        Self {
            instrument,
            normalizer,
            min_quantity,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: Slab::new(),
            order_id_map: HashMap::new(),
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn normalizer(&self) -> &PriceNormalizer {
        &self.normalizer
    }

    pub fn min_quantity(&self) -> f64 {
        self.min_quantity
    }

    // ========================================================================
    // Top of Book
    // ========================================================================

    /// Highest bid tick, or [`NO_BID`] when the bid side is empty
    pub fn best_bid(&self) -> Tick {
        self.bids.keys().next_back().copied().unwrap_or(NO_BID)
    }

    /// Lowest ask tick, or [`NO_ASK`] when the ask side is empty
    pub fn best_ask(&self) -> Tick {
        self.asks.keys().next().copied().unwrap_or(NO_ASK)
    }

    pub fn best_bid_price(&self) -> Option<f64> {
        self.bids
            .keys()
            .next_back()
            .map(|&tick| self.normalizer.denormalize(tick))
    }

    pub fn best_ask_price(&self) -> Option<f64> {
        self.asks
            .keys()
            .next()
            .map(|&tick| self.normalizer.denormalize(tick))
    }

    /// Best ask minus best bid, computed in tick space
    pub fn spread(&self) -> Option<f64> {
        match (self.bids.keys().next_back(), self.asks.keys().next()) {
            (Some(&bid), Some(&ask)) => Some(self.normalizer.denormalize(ask - bid)),
            _ => None,
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Rest an order at the tail of its level and index it.
    pub(crate) fn insert_resting(&mut self, order: Order) -> OrderKey {
        let tick = self.normalizer.normalize(order.price);
        let order_id = order.order_id;
        let side = order.side;

        let key = self.orders.insert(order);
        self.levels_mut(side)
            .entry(tick)
            .or_insert_with(|| PriceLevel::new(tick))
            .push_back(key);
        self.order_id_map.insert(order_id, key);

        tracing::trace!(
            instrument = %self.instrument,
            %order_id,
            %side,
            tick,
            "order rested"
        );

        key
    }

    /// Remove a resting order from its level and the index, releasing its
    /// record to the caller. An emptied level is dropped.
    ///
    /// # Errors
    /// Returns `OrderNotFound` if the id is not indexed; the book is untouched.
    pub fn remove(&mut self, order_id: OrderId) -> MatchingResult<Order> {
        let key = *self
            .order_id_map
            .get(&order_id)
            .ok_or_else(|| MatchingError::OrderNotFound {
                instrument: self.instrument.to_string(),
                order_id,
            })?;

        let (side, tick) = match self.orders.get(key) {
            Some(order) => (order.side, self.normalizer.normalize(order.price)),
            None => consistency_fault(&self.instrument, order_id, "indexed handle has no record"),
        };

        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let emptied = match levels.get_mut(&tick) {
            Some(level) => {
                if !level.remove(key) {
                    consistency_fault(&self.instrument, order_id, "missing from its price level");
                }
                level.is_empty()
            }
            None => consistency_fault(&self.instrument, order_id, "missing from its price level"),
        };
        if emptied {
            levels.remove(&tick);
        }

        self.order_id_map.remove(&order_id);
        Ok(self.orders.remove(key))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Live record of a resting order
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        self.order_id_map
            .get(&order_id)
            .and_then(|&key| self.orders.get(key))
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.order_id_map.contains_key(&order_id)
    }

    /// Number of resting orders on both sides
    pub fn len(&self) -> usize {
        self.order_id_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order_id_map.is_empty()
    }

    /// Resting orders at one price, front (earliest) first.
    ///
    /// # Errors
    /// Returns `PriceLevelNotFound` if no level exists at the price's tick.
    pub fn queue_at(&self, side: Side, price: f64) -> MatchingResult<Vec<&Order>> {
        self.normalizer
            .try_normalize(price)
            .ok()
            .and_then(|tick| self.levels(side).get(&tick))
            .map(|level| self.level_orders(level).collect())
            .ok_or_else(|| MatchingError::PriceLevelNotFound {
                instrument: self.instrument.to_string(),
                side,
                price,
            })
    }

    /// Bid levels, best (highest) first
    pub fn bid_levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.bids.values().rev()
    }

    /// Ask levels, best (lowest) first
    pub fn ask_levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.asks.values()
    }

    /// Levels of one side, best first
    pub fn side_levels(&self, side: Side) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match side {
            Side::Buy => Box::new(self.bid_levels()),
            Side::Sell => Box::new(self.ask_levels()),
        }
    }

    /// Orders queued at a level, front first
    pub fn level_orders<'a>(&'a self, level: &'a PriceLevel) -> impl Iterator<Item = &'a Order> + 'a {
        level.keys().filter_map(move |key| self.orders.get(key))
    }

    /// Total leaves quantity resting at a level
    pub fn level_quantity(&self, level: &PriceLevel) -> f64 {
        self.level_orders(level).map(|order| order.leaves_qty).sum()
    }

    /// Aggregated `(price, quantity)` for the best `num_levels` of a side
    pub fn depth(&self, side: Side, num_levels: usize) -> Vec<(f64, f64)> {
        self.side_levels(side)
            .take(num_levels)
            .map(|level| {
                (
                    self.normalizer.denormalize(level.tick()),
                    self.level_quantity(level),
                )
            })
            .collect()
    }

    pub fn snapshot(&self, num_levels: usize) -> OrderBookSnapshot {
        OrderBookSnapshot::with_depth(
            self.instrument.to_string(),
            self.depth(Side::Buy, num_levels),
            self.depth(Side::Sell, num_levels),
        )
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn levels(&self, side: Side) -> &BTreeMap<Tick, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn levels_mut(&mut self, side: Side) -> &mut BTreeMap<Tick, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Panics unless every structural invariant of the book holds.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut queued = 0;

        for (side, levels) in [(Side::Buy, &self.bids), (Side::Sell, &self.asks)] {
            for (&tick, level) in levels {
                assert!(!level.is_empty(), "empty {side} level at {tick}");
                assert_eq!(level.tick(), tick);

                for key in level.keys() {
                    let order = &self.orders[key];
                    assert_eq!(order.side, side);
                    assert_eq!(self.normalizer.normalize(order.price), tick);
                    assert!(order.leaves_qty >= self.min_quantity);
                    assert_eq!(self.order_id_map.get(&order.order_id), Some(&key));
                    queued += 1;
                }
            }
        }

        assert_eq!(queued, self.order_id_map.len());
        assert_eq!(queued, self.orders.len());
        assert!(self.best_bid() < self.best_ask(), "book is crossed");
    }
}

/// An index entry without a matching queue entry is an engine defect.
#[cold]
fn consistency_fault(instrument: &str, order_id: OrderId, detail: &str) -> ! {
    tracing::error!(%instrument, %order_id, detail, "order book consistency fault");
    panic!("order book consistency fault in {instrument}: order {order_id} {detail}");
}

// ============================================================================
// Order Book Snapshot
// ============================================================================

/// Immutable snapshot of the order book state
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderBookSnapshot {
    pub instrument: String,
    /// Bid levels (price, quantity), best first
    pub bids: Vec<(f64, f64)>,
    /// Ask levels (price, quantity), best first
    pub asks: Vec<(f64, f64)>,
    /// Current spread (ask - bid)
    pub spread: Option<f64>,
    /// Mid price
    pub mid_price: Option<f64>,
}

impl OrderBookSnapshot {
    pub fn with_depth(instrument: String, bids: Vec<(f64, f64)>, asks: Vec<(f64, f64)>) -> Self {
        let (spread, mid_price) = match (bids.first(), asks.first()) {
            (Some((bid, _)), Some((ask, _))) => (Some(ask - bid), Some((bid + ask) / 2.0)),
            _ => (None, None),
        };

        Self {
            instrument,
            bids,
            asks,
            spread,
            mid_price,
        }
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|(price, _)| *price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|(price, _)| *price)
    }

    pub fn total_bid_quantity(&self) -> f64 {
        self.bids.iter().map(|(_, qty)| qty).sum()
    }

    pub fn total_ask_quantity(&self) -> f64 {
        self.asks.iter().map(|(_, qty)| qty).sum()
    }
}
