// ============================================================================
// Price Normalizer
// Converts floating prices to integer tick keys and back
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer price key at the configured tick granularity.
pub type Tick = i64;

/// Sentinel for "no bids" (negative infinity in tick space)
pub const NO_BID: Tick = Tick::MIN;

/// Sentinel for "no asks" (positive infinity in tick space)
pub const NO_ASK: Tick = Tick::MAX;

/// Default price granularity
pub const DEFAULT_TICK_SIZE: f64 = 1e-9;

/// Default bias (in ticks) added before flooring
pub const DEFAULT_PRICE_EPSILON: f64 = 1e-2;

/// Default minimum tradable quantity
pub const DEFAULT_MIN_QUANTITY: f64 = 1e-9;

/// Exclusive bound on tick magnitude (2^63); keeps keys off the sentinels
const TICK_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// How a price is scaled into tick space.
///
/// Decimal tick sizes (0.01, 1e-9, ...) have an integral reciprocal. Scaling by
/// that integer instead of dividing by the inexact tick keeps decimal prices
/// round-tripping bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    PerUnit(f64),
    Tick(f64),
}

/// Maps prices onto an integer grid so price-keyed maps never compare floats.
///
/// `normalize(p) = floor(p / tick_size + epsilon)` and
/// `denormalize(t) = t * tick_size`.
///
/// # Example
/// ```
/// use light_matching_engine::numeric::PriceNormalizer;
///
/// let normalizer = PriceNormalizer::new(0.01, 1e-2).unwrap();
/// let tick = normalizer.normalize(100.1);
/// assert_eq!(tick, 10_010);
/// assert_eq!(normalizer.denormalize(tick), 100.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "NormalizerParams", from = "NormalizerParams"))]
pub struct PriceNormalizer {
    tick_size: f64,
    epsilon: f64,
    scale: Scale,
}

impl PriceNormalizer {
    /// Create a normalizer for the given tick size and epsilon bias.
    ///
    /// # Errors
    /// - `InvalidTickSize` if the tick is not finite and strictly positive
    /// - `InvalidEpsilon` if the bias is not within `[0, 1)`
    pub fn new(tick_size: f64, epsilon: f64) -> NumericResult<Self> {
        if !tick_size.is_finite() || tick_size <= 0.0 {
            return Err(NumericError::InvalidTickSize(tick_size));
        }
        if !epsilon.is_finite() || !(0.0..1.0).contains(&epsilon) {
            return Err(NumericError::InvalidEpsilon(epsilon));
        }

        Ok(Self::new_unchecked(tick_size, epsilon))
    }

    fn new_unchecked(tick_size: f64, epsilon: f64) -> Self {
        let inverse = 1.0 / tick_size;
        let rounded = inverse.round();
        let scale = if rounded >= 1.0 && (inverse - rounded).abs() <= rounded * 1e-9 {
            Scale::PerUnit(rounded)
        } else {
            Scale::Tick(tick_size)
        };

        Self {
            tick_size,
            epsilon,
            scale,
        }
    }

    pub fn tick_size(&self) -> f64 {
        self.tick_size
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Convert a price to its tick key.
    ///
    /// Saturates for non-finite or out-of-range input; use
    /// [`try_normalize`](Self::try_normalize) on untrusted prices.
    #[inline]
    pub fn normalize(&self, price: f64) -> Tick {
        (self.scaled(price) + self.epsilon).floor() as Tick
    }

    /// Convert a price to its tick key, rejecting values that cannot be keyed.
    ///
    /// # Errors
    /// - `NonFinite` for NaN or infinite prices
    /// - `TickOverflow` if the key falls outside the `i64` range or onto a
    ///   sentinel
    pub fn try_normalize(&self, price: f64) -> NumericResult<Tick> {
        if !price.is_finite() {
            return Err(NumericError::NonFinite(price));
        }

        let biased = (self.scaled(price) + self.epsilon).floor();
        if biased.abs() >= TICK_LIMIT {
            return Err(NumericError::TickOverflow(price));
        }

        Ok(biased as Tick)
    }

    /// Convert a tick key back to a price.
    #[inline]
    pub fn denormalize(&self, tick: Tick) -> f64 {
        match self.scale {
            Scale::PerUnit(per_unit) => tick as f64 / per_unit,
            Scale::Tick(tick_size) => tick as f64 * tick_size,
        }
    }

    /// Exact decimal value of a tick key, for display and host marshaling.
    ///
    /// # Errors
    /// Returns `TickOverflow` if the value does not fit a `Decimal`.
    pub fn to_decimal(&self, tick: Tick) -> NumericResult<Decimal> {
        let overflow = || NumericError::TickOverflow(self.denormalize(tick));

        match self.scale {
            Scale::PerUnit(per_unit) => {
                let divisor = Decimal::from_f64(per_unit).ok_or_else(overflow)?;
                Decimal::from(tick)
                    .checked_div(divisor)
                    .map(|d| d.normalize())
                    .ok_or_else(overflow)
            },
            Scale::Tick(tick_size) => {
                let step = Decimal::from_f64(tick_size).ok_or_else(overflow)?;
                Decimal::from(tick)
                    .checked_mul(step)
                    .map(|d| d.normalize())
                    .ok_or_else(overflow)
            },
        }
    }

    #[inline]
    fn scaled(&self, price: f64) -> f64 {
        match self.scale {
            Scale::PerUnit(per_unit) => price * per_unit,
            Scale::Tick(tick_size) => price / tick_size,
        }
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_TICK_SIZE, DEFAULT_PRICE_EPSILON)
    }
}

/// Serialized form; the scale is derived again on load.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct NormalizerParams {
    tick_size: f64,
    epsilon: f64,
}

#[cfg(feature = "serde")]
impl From<PriceNormalizer> for NormalizerParams {
    fn from(normalizer: PriceNormalizer) -> Self {
        Self {
            tick_size: normalizer.tick_size,
            epsilon: normalizer.epsilon,
        }
    }
}

#[cfg(feature = "serde")]
impl From<NormalizerParams> for PriceNormalizer {
    fn from(params: NormalizerParams) -> Self {
        Self::new_unchecked(params.tick_size, params.epsilon)
    }
}
