// ============================================================================
// Engine Configuration
// Tick granularity and minimum quantity, engine-wide and per instrument
// ============================================================================

use std::collections::HashMap;

use crate::error::{MatchingError, MatchingResult};
use crate::numeric::{
    PriceNormalizer, DEFAULT_MIN_QUANTITY, DEFAULT_PRICE_EPSILON, DEFAULT_TICK_SIZE,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Instrument Overrides
// ============================================================================

/// Per-instrument overrides; unset fields fall back to the engine defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentConfig {
    pub tick_size: Option<f64>,
    pub price_epsilon: Option<f64>,
    pub min_quantity: Option<f64>,
}

impl InstrumentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_size(mut self, tick: f64) -> Self {
        self.tick_size = Some(tick);
        self
    }

    pub fn with_price_epsilon(mut self, epsilon: f64) -> Self {
        self.price_epsilon = Some(epsilon);
        self
    }

    pub fn with_min_quantity(mut self, quantity: f64) -> Self {
        self.min_quantity = Some(quantity);
        self
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Price granularity for tick normalization
    pub tick_size: f64,

    /// Bias, in ticks, added before flooring a scaled price
    pub price_epsilon: f64,

    /// Leaves quantity under which an order counts as fully filled
    pub min_quantity: f64,

    /// Overrides keyed by instrument
    pub instruments: HashMap<String, InstrumentConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_size: DEFAULT_TICK_SIZE,
            price_epsilon: DEFAULT_PRICE_EPSILON,
            min_quantity: DEFAULT_MIN_QUANTITY,
            instruments: HashMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equity-style preset: $0.01 ticks
    pub fn cents() -> Self {
        Self::default().with_tick_size(0.01)
    }

    pub fn with_tick_size(mut self, tick: f64) -> Self {
        self.tick_size = tick;
        self
    }

    pub fn with_price_epsilon(mut self, epsilon: f64) -> Self {
        self.price_epsilon = epsilon;
        self
    }

    pub fn with_min_quantity(mut self, quantity: f64) -> Self {
        self.min_quantity = quantity;
        self
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>, config: InstrumentConfig) -> Self {
        self.instruments.insert(instrument.into(), config);
        self
    }

    /// Validate engine defaults and every instrument override
    pub fn validate(&self) -> MatchingResult<()> {
        PriceNormalizer::new(self.tick_size, self.price_epsilon)?;
        validate_min_quantity(self.min_quantity)?;

        for (instrument, overrides) in &self.instruments {
            if instrument.is_empty() {
                return Err(MatchingError::InvalidConfig(
                    "instrument cannot be empty".to_string(),
                ));
            }
            self.book_params(instrument).map_err(|err| {
                MatchingError::InvalidConfig(format!("{instrument}: {err}"))
            })?;
            if let Some(quantity) = overrides.min_quantity {
                validate_min_quantity(quantity)?;
            }
        }

        Ok(())
    }

    /// Normalizer and minimum quantity for an instrument's book
    pub fn book_params(&self, instrument: &str) -> MatchingResult<(PriceNormalizer, f64)> {
        let overrides = self.instruments.get(instrument);
        let tick_size = overrides
            .and_then(|o| o.tick_size)
            .unwrap_or(self.tick_size);
        let epsilon = overrides
            .and_then(|o| o.price_epsilon)
            .unwrap_or(self.price_epsilon);
        let min_quantity = overrides
            .and_then(|o| o.min_quantity)
            .unwrap_or(self.min_quantity);

        Ok((PriceNormalizer::new(tick_size, epsilon)?, min_quantity))
    }
}

fn validate_min_quantity(quantity: f64) -> MatchingResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(MatchingError::InvalidConfig(format!(
            "minimum quantity must be finite and positive, got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.tick_size, DEFAULT_TICK_SIZE);
        assert_eq!(config.min_quantity, DEFAULT_MIN_QUANTITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::cents()
            .with_min_quantity(0.001)
            .with_instrument("BTC-USD", InstrumentConfig::new().with_tick_size(0.5));

        assert!(config.validate().is_ok());

        let (normalizer, min_quantity) = config.book_params("BTC-USD").unwrap();
        assert_eq!(normalizer.tick_size(), 0.5);
        assert_eq!(min_quantity, 0.001);

        let (normalizer, _) = config.book_params("AAPL").unwrap();
        assert_eq!(normalizer.tick_size(), 0.01);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            EngineConfig::new().with_tick_size(-1.0).validate(),
            Err(MatchingError::Numeric(NumericError::InvalidTickSize(-1.0)))
        );
        assert!(matches!(
            EngineConfig::new().with_min_quantity(0.0).validate(),
            Err(MatchingError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::new()
                .with_instrument("", InstrumentConfig::new())
                .validate(),
            Err(MatchingError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::new()
                .with_instrument("X", InstrumentConfig::new().with_price_epsilon(2.0))
                .validate(),
            Err(MatchingError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::new()
                .with_instrument("X", InstrumentConfig::new().with_min_quantity(f64::NAN))
                .validate(),
            Err(MatchingError::InvalidConfig(_))
        ));
    }
}
