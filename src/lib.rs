// ============================================================================
// Light Matching Engine Library
// In-memory price/time priority order matching over many instruments
// ============================================================================

//! # Light Matching Engine
//!
//! A single-threaded, in-memory central limit order book matching engine.
//!
//! ## Features
//!
//! - **Price/time priority** matching with FIFO queues per price level
//! - **Integer tick keys** so float prices that agree at the tick size share a level
//! - **Lazy per-instrument books** with engine-local order and trade ids
//! - **Arena-backed order records** addressed by stable handles
//! - **Event handlers** for audit trails and logging
//!
//! ## Example
//!
//! ```rust
//! use light_matching_engine::prelude::*;
//!
//! let mut engine = MatchingEngine::new();
//!
//! // Rest two sell orders at the same price
//! engine.add_order("BTC-USD", 50_000.0, 3.0, Side::Sell).unwrap();
//! engine.add_order("BTC-USD", 50_000.0, 4.0, Side::Sell).unwrap();
//!
//! // Sweep them with a larger buy
//! let (buy, trades) = engine.add_order("BTC-USD", 50_010.0, 10.0, Side::Buy).unwrap();
//!
//! // One trade per resting order, then the aggregate for the buy
//! assert_eq!(trades.len(), 3);
//! assert_eq!(trades[2].trade_qty, 7.0);
//! assert_eq!(buy.leaves_qty, 3.0);
//!
//! let snapshot = engine.snapshot("BTC-USD", 10).unwrap();
//! println!("Best bid: {:?}", snapshot.best_bid());
//! println!("Best ask: {:?}", snapshot.best_ask());
//! println!("Spread: {:?}", snapshot.spread);
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod numeric;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::order::state::OrderState;
    pub use crate::domain::{
        EngineConfig, InstrumentConfig, Order, OrderBook, OrderBookSnapshot, OrderId, PriceLevel,
        Side, Trade, TradeId,
    };
    pub use crate::engine::{
        create_from_config, MatchingEngine, MatchingEngineBuilder, SharedMatchingEngine,
    };
    pub use crate::error::{MatchingError, MatchingResult};
    pub use crate::interfaces::{EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;

    const INSTRUMENT: &str = "TestingInstrument";
    const PRICE: f64 = 100.0;
    const LOT_SIZE: f64 = 1.0;

    fn assert_levels(engine: &MatchingEngine, bids: usize, asks: usize) {
        let book = engine.order_book(INSTRUMENT).unwrap();
        assert_eq!(book.bid_levels().count(), bids);
        assert_eq!(book.ask_levels().count(), asks);
    }

    fn assert_trade(trade: &Trade, order_id: i64, price: f64, qty: f64, side: Side, trade_id: i64) {
        assert_eq!(trade.order_id, OrderId::new(order_id));
        assert_eq!(&*trade.instrument, INSTRUMENT);
        assert_eq!(trade.trade_price, price);
        assert_eq!(trade.trade_qty, qty);
        assert_eq!(trade.trade_side, side);
        assert_eq!(trade.trade_id, TradeId::new(trade_id));
    }

    #[test]
    fn test_cancel_order() {
        let mut engine = MatchingEngine::new();

        let (order, trades) = engine.add_order(INSTRUMENT, PRICE, LOT_SIZE, Side::Buy).unwrap();
        assert!(trades.is_empty());
        assert_eq!(order.order_id, OrderId::new(1));
        assert_levels(&engine, 1, 0);

        let cancelled = engine.cancel_order(order.order_id, INSTRUMENT).unwrap();
        assert_eq!(cancelled.order_id, order.order_id);
        assert_eq!(cancelled.leaves_qty, 0.0);
        assert_levels(&engine, 0, 0);

        let (order, trades) = engine.add_order(INSTRUMENT, PRICE, LOT_SIZE, Side::Sell).unwrap();
        assert!(trades.is_empty());
        assert_eq!(order.order_id, OrderId::new(2));
        assert_levels(&engine, 0, 1);

        let cancelled = engine.cancel_order(order.order_id, INSTRUMENT).unwrap();
        assert_eq!(cancelled.leaves_qty, 0.0);
        assert_levels(&engine, 0, 0);
    }

    #[test]
    fn test_fill_order() {
        let mut engine = MatchingEngine::new();

        let (buy, _) = engine.add_order(INSTRUMENT, PRICE, LOT_SIZE, Side::Buy).unwrap();
        let (sell, trades) = engine.add_order(INSTRUMENT, PRICE, LOT_SIZE, Side::Sell).unwrap();

        assert_levels(&engine, 0, 0);
        assert_eq!(trades.len(), 2);
        assert_trade(&trades[0], buy.order_id.value(), PRICE, LOT_SIZE, Side::Buy, 1);
        assert_trade(&trades[1], sell.order_id.value(), PRICE, LOT_SIZE, Side::Sell, 2);

        assert_eq!(sell.cum_qty, LOT_SIZE);
        assert_eq!(sell.leaves_qty, 0.0);
        assert_eq!(sell.state, OrderState::Filled);
    }

    #[test]
    fn test_fill_multiple_orders_same_level() {
        let mut engine = MatchingEngine::new();

        for i in 1..=10 {
            let (order, trades) = engine.add_order(INSTRUMENT, PRICE, LOT_SIZE, Side::Buy).unwrap();
            assert!(trades.is_empty());
            assert_eq!(order.order_id, OrderId::new(i));
            assert_levels(&engine, 1, 0);
            assert_eq!(
                engine.queue_at(INSTRUMENT, Side::Buy, PRICE).unwrap().len(),
                i as usize
            );
        }

        let (sell, trades) = engine
            .add_order(INSTRUMENT, PRICE, 10.0 * LOT_SIZE, Side::Sell)
            .unwrap();
        assert_levels(&engine, 0, 0);
        assert_eq!(trades.len(), 11);
        assert_eq!(sell.order_id, OrderId::new(11));
        assert_eq!(sell.cum_qty, 10.0 * LOT_SIZE);

        // Passive fills in arrival order, then the aggressor
        for i in 1..=10 {
            assert_trade(&trades[i as usize - 1], i, PRICE, LOT_SIZE, Side::Buy, i);
        }
        assert_trade(&trades[10], 11, PRICE, 10.0 * LOT_SIZE, Side::Sell, 11);
    }

    #[test]
    fn test_fill_multiple_orders_different_level() {
        let mut engine = MatchingEngine::new();

        for i in 1..=10 {
            let price = PRICE + i as f64;
            engine.add_order(INSTRUMENT, price, LOT_SIZE, Side::Buy).unwrap();
            assert_levels(&engine, i, 0);
            assert_eq!(engine.queue_at(INSTRUMENT, Side::Buy, price).unwrap().len(), 1);
        }

        let (sell, trades) = engine
            .add_order(INSTRUMENT, PRICE, 10.0 * LOT_SIZE, Side::Sell)
            .unwrap();
        assert_levels(&engine, 0, 0);
        assert_eq!(trades.len(), 20);
        assert_eq!(sell.leaves_qty, 0.0);

        // Best bid first: 110 down to 101
        for i in 0..10 {
            let match_price = PRICE + 10.0 - i as f64;
            let trade_id = 2 * i as i64;
            assert_trade(&trades[2 * i], 10 - i as i64, match_price, LOT_SIZE, Side::Buy, trade_id + 1);
            assert_trade(&trades[2 * i + 1], 11, match_price, LOT_SIZE, Side::Sell, trade_id + 2);
        }
    }

    #[test]
    fn test_cancel_partial_fill_orders() {
        let mut engine = MatchingEngine::new();

        let (buy1, _) = engine
            .add_order(INSTRUMENT, PRICE + 0.1, LOT_SIZE, Side::Buy)
            .unwrap();
        let (buy2, _) = engine
            .add_order(INSTRUMENT, PRICE, 2.0 * LOT_SIZE, Side::Buy)
            .unwrap();
        assert_levels(&engine, 2, 0);

        let (sell, trades) = engine
            .add_order(INSTRUMENT, PRICE, 2.0 * LOT_SIZE, Side::Sell)
            .unwrap();
        assert_levels(&engine, 1, 0);
        assert_eq!(trades.len(), 4);
        assert_trade(&trades[0], 1, PRICE + 0.1, LOT_SIZE, Side::Buy, 1);
        assert_trade(&trades[1], 3, PRICE + 0.1, LOT_SIZE, Side::Sell, 2);
        assert_trade(&trades[2], 2, PRICE, LOT_SIZE, Side::Buy, 3);
        assert_trade(&trades[3], 3, PRICE, LOT_SIZE, Side::Sell, 4);
        assert_eq!(sell.cum_qty, 2.0 * LOT_SIZE);

        assert!(engine.get_order(INSTRUMENT, buy1.order_id).is_none());
        let live = engine.get_order(INSTRUMENT, buy2.order_id).unwrap();
        assert_eq!(live.cum_qty, LOT_SIZE);
        assert_eq!(live.leaves_qty, LOT_SIZE);

        let cancelled = engine.cancel_order(buy2.order_id, INSTRUMENT).unwrap();
        assert_levels(&engine, 0, 0);
        assert_eq!(cancelled.leaves_qty, 0.0);
        assert_eq!(cancelled.cum_qty, LOT_SIZE);
        assert_eq!(cancelled.qty, 2.0 * LOT_SIZE);
    }

    #[test]
    fn test_decimal_prices_share_a_level() {
        let mut engine = MatchingEngine::new();

        // 0.1 + 0.2 != 0.3 in binary floating point
        engine.add_order(INSTRUMENT, 0.1 + 0.2, LOT_SIZE, Side::Sell).unwrap();
        engine.add_order(INSTRUMENT, 0.3, LOT_SIZE, Side::Sell).unwrap();

        assert_levels(&engine, 0, 1);
        assert_eq!(engine.queue_at(INSTRUMENT, Side::Sell, 0.3).unwrap().len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_serializes() {
        let mut engine = MatchingEngine::new();
        engine.add_order(INSTRUMENT, PRICE, LOT_SIZE, Side::Buy).unwrap();

        let snapshot = engine.snapshot(INSTRUMENT, 5).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: OrderBookSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
