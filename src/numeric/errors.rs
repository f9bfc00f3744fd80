// ============================================================================
// Numeric Errors
// Error types for price normalization
// ============================================================================

use thiserror::Error;

/// Errors that can occur while converting prices to tick keys.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NumericError {
    /// Input was NaN or infinite
    #[error("non-finite value: {0}")]
    NonFinite(f64),
    /// Tick size must be finite and strictly positive
    #[error("invalid tick size: {0}")]
    InvalidTickSize(f64),
    /// Epsilon bias must lie in [0, 1) ticks
    #[error("invalid price epsilon: {0}")]
    InvalidEpsilon(f64),
    /// Tick key would fall outside the exactly representable range
    #[error("price {0} is out of range for the configured tick size")]
    TickOverflow(f64),
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::InvalidTickSize(0.0).to_string(),
            "invalid tick size: 0"
        );
        assert_eq!(
            NumericError::TickOverflow(5.5).to_string(),
            "price 5.5 is out of range for the configured tick size"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::NonFinite(1.0), NumericError::NonFinite(1.0));
        assert_ne!(
            NumericError::InvalidTickSize(1.0),
            NumericError::InvalidEpsilon(1.0)
        );
    }
}
