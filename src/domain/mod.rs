// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod order;
pub mod order_book;
pub mod price_level;
pub mod trade;

pub use config::{EngineConfig, InstrumentConfig};
pub use order::{Order, OrderId, Side};
pub use order_book::{OrderBook, OrderBookSnapshot};
pub use price_level::PriceLevel;
pub use trade::{Trade, TradeId};

// Re-export order state
pub use order::state::OrderState;
