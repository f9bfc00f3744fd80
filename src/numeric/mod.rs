// ============================================================================
// Numeric Module
// Price normalization onto an integer tick grid
// ============================================================================
//
// This module provides:
// - PriceNormalizer: floating price <-> integer tick key conversion
// - NumericError: Error types for normalization
// - Engine-wide defaults for tick size, epsilon bias and minimum quantity
//
// Design principles:
// - Price-keyed containers only ever compare integers
// - Prices equal at the tick granularity always map to the same key
// - Conversions of untrusted input return Result (no panics)

mod errors;
mod normalizer;

pub use errors::{NumericError, NumericResult};
pub use normalizer::{
    PriceNormalizer, Tick, DEFAULT_MIN_QUANTITY, DEFAULT_PRICE_EPSILON, DEFAULT_TICK_SIZE,
    NO_ASK, NO_BID,
};
