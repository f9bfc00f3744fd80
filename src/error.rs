// ============================================================================
// Matching Errors
// Caller-facing error taxonomy for the engine and its order books
// ============================================================================

use thiserror::Error;

use crate::domain::{OrderId, Side};
use crate::numeric::NumericError;

/// Errors returned by engine and order book operations.
///
/// Every variant is detected before the failing call mutates any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchingError {
    /// No order book exists for the instrument
    #[error("instrument {0} has no order book")]
    InstrumentNotFound(String),

    /// The order id is not resting in the instrument's book
    #[error("order {order_id} not found in {instrument}")]
    OrderNotFound { instrument: String, order_id: OrderId },

    /// No resting liquidity at the requested price
    #[error("no {side} price level at {price} in {instrument}")]
    PriceLevelNotFound {
        instrument: String,
        side: Side,
        price: f64,
    },

    /// Order request rejected by input validation
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Engine or instrument configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tick normalization parameters rejected
    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Result type alias for engine operations
pub type MatchingResult<T> = Result<T, MatchingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatchingError::OrderNotFound {
            instrument: "X".to_string(),
            order_id: OrderId::new(42),
        };
        assert_eq!(err.to_string(), "order 42 not found in X");

        let err = MatchingError::PriceLevelNotFound {
            instrument: "X".to_string(),
            side: Side::Buy,
            price: 99.5,
        };
        assert_eq!(err.to_string(), "no BUY price level at 99.5 in X");

        assert_eq!(
            MatchingError::InstrumentNotFound("Y".to_string()).to_string(),
            "instrument Y has no order book"
        );
    }

    #[test]
    fn test_numeric_conversion() {
        let err: MatchingError = NumericError::InvalidTickSize(0.0).into();
        assert_eq!(err.to_string(), "invalid tick size: 0");
    }
}
