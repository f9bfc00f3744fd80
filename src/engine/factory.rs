// ============================================================================
// Matching Engine Factory
// Creates matching engines with proper configuration
// ============================================================================

use crate::domain::{EngineConfig, InstrumentConfig};
use crate::engine::MatchingEngine;
use crate::error::MatchingResult;
use crate::interfaces::{EventHandler, NoOpEventHandler};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a matching engine from configuration
///
/// # Arguments
/// * `config` - Engine-wide defaults and per-instrument overrides
/// * `event_handler` - Event handler for order and trade events
///
/// # Example
/// ```
/// use light_matching_engine::prelude::*;
/// use light_matching_engine::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let engine = create_from_config(EngineConfig::cents(), Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(engine.config().tick_size, 0.01);
/// ```
pub fn create_from_config(
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
) -> MatchingResult<MatchingEngine> {
    Ok(MatchingEngine::with_config(config)?.with_event_handler(event_handler))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating matching engines with fluent API
///
/// # Example
/// ```
/// use light_matching_engine::prelude::*;
/// use std::sync::Arc;
///
/// let mut engine = MatchingEngineBuilder::new()
///     .with_tick_size(0.01)
///     .with_instrument("BTC-USD", InstrumentConfig::new().with_tick_size(0.5))
///     .event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
///
/// let (order, trades) = engine.add_order("BTC-USD", 50_000.0, 1.0, Side::Buy).unwrap();
/// assert!(trades.is_empty());
/// assert_eq!(order.leaves_qty, 1.0);
/// ```
pub struct MatchingEngineBuilder {
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
}

impl Default for MatchingEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    // ========================================================================
    // Book Parameters
    // ========================================================================

    /// Set the default price tick size
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.config.tick_size = tick_size;
        self
    }

    /// Set the default normalization bias, in ticks
    pub fn with_price_epsilon(mut self, epsilon: f64) -> Self {
        self.config.price_epsilon = epsilon;
        self
    }

    /// Set the default minimum quantity
    pub fn with_min_quantity(mut self, quantity: f64) -> Self {
        self.config.min_quantity = quantity;
        self
    }

    /// Override book parameters for one instrument
    pub fn with_instrument(mut self, instrument: impl Into<String>, config: InstrumentConfig) -> Self {
        self.config.instruments.insert(instrument.into(), config);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    pub fn event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> MatchingResult<MatchingEngine> {
        create_from_config(self.config, self.event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }
}
