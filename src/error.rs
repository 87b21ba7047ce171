//! Library error types
//!
//! All errors are synchronous and immediate: a failed call performs no
//! retries and leaves no partial side effects.

use thiserror::Error;

/// Errors reported by the simulation core
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimError {
    /// Two vectors of different order met in one computation
    #[error("vector order mismatch: expected order {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `World::advance` was called with a negative time step
    #[error("negative time step: {0}")]
    NegativeTimeStep(f64),

    /// The random body generator found no non-overlapping slot within its
    /// retry budget
    #[error("no non-overlapping placement found within {attempts} attempts")]
    PlacementExhausted { attempts: u32 },
}
