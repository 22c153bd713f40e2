//! Core error types.
//!
//! Numeric inputs are clamped rather than rejected, so these errors only
//! cover construction invariants and the persistence deadline.

use thiserror::Error;

/// Errors raised by the difficulty controller and adaptive engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The bootstrap training set could not be separated by the fitted boundary.
    #[error("classifier fit failed: {misclassified} of the bootstrap rows misclassified")]
    ClassifierFit { misclassified: usize },

    /// A persistence call exceeded the configured deadline.
    #[error("persistence call '{operation}' timed out after {timeout_ms}ms")]
    PersistenceTimeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// A difficulty value outside 1..=3 was given where clamping is not applicable.
    #[error("invalid difficulty level: {0} (expected 1, 2 or 3)")]
    InvalidDifficulty(i64),
}

impl CoreError {
    /// Returns `true` if retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::PersistenceTimeout { .. })
    }
}
