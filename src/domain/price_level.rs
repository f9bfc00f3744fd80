// ============================================================================
// Price Level
// FIFO queue of resting order handles at one tick price
// ============================================================================

use std::collections::VecDeque;

use crate::numeric::Tick;

/// Stable handle of an order record inside its book's arena.
pub(crate) type OrderKey = usize;

/// Resting orders sharing one instrument, side and tick price.
///
/// Arrival order inside the queue is time priority: the front is matched
/// first. The level stores handles only; the records live in the book.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    tick: Tick,
    orders: VecDeque<OrderKey>,
}

impl PriceLevel {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            orders: VecDeque::with_capacity(4),
        }
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Number of resting orders at this level
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Append at the tail (lowest time priority)
    pub(crate) fn push_back(&mut self, key: OrderKey) {
        self.orders.push_back(key);
    }

    /// Earliest-arrived order, if any
    pub(crate) fn front(&self) -> Option<OrderKey> {
        self.orders.front().copied()
    }

    pub(crate) fn pop_front(&mut self) -> Option<OrderKey> {
        self.orders.pop_front()
    }

    /// Remove a handle by identity, keeping the relative order of the rest.
    ///
    /// Returns false if the handle is not queued here.
    pub(crate) fn remove(&mut self, key: OrderKey) -> bool {
        match self.orders.iter().position(|&queued| queued == key) {
            Some(position) => self.orders.remove(position).is_some(),
            None => false,
        }
    }

    /// Handles from front to back
    pub(crate) fn keys(&self) -> impl Iterator<Item = OrderKey> + '_ {
        self.orders.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_level_fifo_order() {
        let mut level = PriceLevel::new(100);
        level.push_back(3);
        level.push_back(1);
        level.push_back(2);

        assert_eq!(level.len(), 3);
        assert_eq!(level.front(), Some(3));
        assert_eq!(level.pop_front(), Some(3));
        assert_eq!(level.front(), Some(1));
        assert_eq!(level.tick(), 100);
    }

    #[test]
    fn test_price_level_remove_middle() {
        let mut level = PriceLevel::new(100);
        for key in 0..4 {
            level.push_back(key);
        }

        assert!(level.remove(2));
        assert_eq!(level.keys().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert!(!level.remove(2));
    }

    #[test]
    fn test_price_level_empty() {
        let mut level = PriceLevel::new(-5);
        assert!(level.is_empty());
        assert_eq!(level.front(), None);

        level.push_back(9);
        assert!(level.remove(9));
        assert!(level.is_empty());
        assert_eq!(level.pop_front(), None);
    }
}
