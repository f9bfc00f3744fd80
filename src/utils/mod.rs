// ============================================================================
// Utilities Module
// Host-side helpers that sit outside the matching path
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::{init_logging, DEFAULT_LOG_FILTER};
