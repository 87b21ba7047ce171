//! Physical body state
//!
//! A [`Body`] is pure data: mass, radius, position and velocity. How a body
//! is drawn (color, scale, widget) is entirely the presentation layer's
//! business and never enters the core.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::vector::Vector;

/// A circular rigid body
///
/// Mass and radius are not validated: non-positive values are a caller
/// contract violation and produce physically meaningless results rather
/// than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mass: f64,
    pub radius: f64,
    pub position: Vector,
    pub velocity: Vector,
}

impl Body {
    /// Fails with `DimensionMismatch` if position and velocity orders differ
    pub fn new(
        mass: f64,
        radius: f64,
        position: Vector,
        velocity: Vector,
    ) -> Result<Self, SimError> {
        if position.order() != velocity.order() {
            return Err(SimError::DimensionMismatch {
                expected: position.order(),
                actual: velocity.order(),
            });
        }
        Ok(Self {
            mass,
            radius,
            position,
            velocity,
        })
    }

    /// Vector order shared by position and velocity
    #[inline]
    pub fn order(&self) -> usize {
        self.position.order()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m = {}  r = {}  pos: {}  vel: {}",
            self.mass, self.radius, self.position, self.velocity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_orders() {
        let result = Body::new(1.0, 1.0, Vector::zeros(2), Vector::zeros(3));
        assert_eq!(
            result,
            Err(SimError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn new_accepts_matching_orders() {
        let body = Body::new(2.0, 0.5, Vector::new([1.0, 2.0]), Vector::new([0.0, -1.0]));
        assert!(body.is_ok());
        assert_eq!(body.unwrap().order(), 2);
    }
}
