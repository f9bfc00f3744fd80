// ============================================================================
// Price/Time Priority Matching Algorithm (FIFO)
// ============================================================================

use std::collections::btree_map::OccupiedEntry;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{Order, OrderBook, PriceLevel, Side, Trade, TradeId};
use crate::numeric::Tick;

/// Result of draining the opposite side against one incoming order
#[derive(Debug, Default)]
pub(crate) struct MatchOutcome {
    /// Trades in emission order
    pub trades: Vec<Trade>,
    /// Resting orders fully filled and released from the book
    pub filled: Vec<Order>,
}

/// Whether an incoming order at `tick` crosses the best opposing tick.
///
/// With the empty-side sentinels (`NO_ASK`, `NO_BID`) this is never true.
#[inline]
pub(crate) fn crosses(side: Side, tick: Tick, best_opposite: Tick) -> bool {
    match side {
        Side::Buy => tick >= best_opposite,
        Side::Sell => tick <= best_opposite,
    }
}

/// Match an incoming order against the opposite side of its book.
///
/// Levels are drained best price first; within a level resting orders fill
/// strictly in arrival order. Every fill produces a trade attributed to the
/// resting order. Once a level is done, one aggregate trade attributed to the
/// incoming order covers everything it took at that price.
///
/// # Example
/// ```text
/// Book:  Sell 3 @ 98 (order 1), Sell 4 @ 98 (order 2)
///
/// Incoming: Buy 10 @ 99
/// Trades:   order 1 x3 @ 98, order 2 x4 @ 98, order 3 x7 @ 98
/// Remainder: Buy 3 @ 99 rests
/// ```
///
/// The incoming order is not rested here; the engine decides that from its
/// leaves once matching returns.
pub(crate) fn match_order(
    book: &mut OrderBook,
    incoming: &mut Order,
    curr_trade_id: &mut i64,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();
    let tick = book.normalizer.normalize(incoming.price);

    let OrderBook {
        instrument,
        normalizer,
        min_quantity,
        bids,
        asks,
        orders,
        order_id_map,
    } = book;
    let min_quantity = *min_quantity;
    let opposite = match incoming.side.opposite() {
        Side::Buy => bids,
        Side::Sell => asks,
    };

    while incoming.leaves_qty > min_quantity {
        let Some(mut best) = best_level(opposite, incoming.side) else {
            break;
        };
        let level_tick = *best.key();
        if !crosses(incoming.side, tick, level_tick) {
            break;
        }

        let trade_price = normalizer.denormalize(level_tick);
        let level = best.get_mut();
        let level_start_leaves = incoming.leaves_qty;

        while incoming.leaves_qty > min_quantity {
            let Some(key) = level.front() else {
                break;
            };

            let resting = &mut orders[key];
            let matched_qty = incoming.leaves_qty.min(resting.leaves_qty);
            incoming.fill(matched_qty, min_quantity);
            resting.fill(matched_qty, min_quantity);

            *curr_trade_id += 1;
            outcome.trades.push(Trade::new(
                resting.order_id,
                Arc::clone(instrument),
                trade_price,
                matched_qty,
                resting.side,
                TradeId::new(*curr_trade_id),
            ));

            tracing::trace!(
                %instrument,
                resting = %resting.order_id,
                incoming = %incoming.order_id,
                price = trade_price,
                quantity = matched_qty,
                "fill"
            );

            if resting.leaves_qty < min_quantity {
                order_id_map.remove(&resting.order_id);
                level.pop_front();
                outcome.filled.push(orders.remove(key));
            }
        }

        *curr_trade_id += 1;
        outcome.trades.push(Trade::new(
            incoming.order_id,
            Arc::clone(instrument),
            trade_price,
            level_start_leaves - incoming.leaves_qty,
            incoming.side,
            TradeId::new(*curr_trade_id),
        ));

        if level.is_empty() {
            best.remove();
        }
    }

    outcome
}

/// Best opposing level for an incoming order of `side`
fn best_level(
    levels: &mut BTreeMap<Tick, PriceLevel>,
    side: Side,
) -> Option<OccupiedEntry<'_, Tick, PriceLevel>> {
    match side {
        Side::Buy => levels.first_entry(),
        Side::Sell => levels.last_entry(),
    }
}
